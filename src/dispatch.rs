//! Parallel tile processing on a bounded worker pool

use crate::config::GridConfig;
use crate::error::{Error, Result};
use crate::geometry::GeometryProvider;
use crate::tile::Tile;
use crate::writer::{TileOutcome, TileWriter};
use rayon::ThreadPool;
use rayon::prelude::*;

/// Process `tiles` with at most `grid().workers` tiles in flight
///
/// Each tile gets its own result; a failing tile does not stop or affect
/// the others. Results are returned in input order.
///
/// # Errors
///
/// Only if the worker pool cannot be created.
pub fn run_tiles<G>(
    writer: &TileWriter<'_, G>,
    tiles: &[Tile],
) -> Result<Vec<(Tile, Result<TileOutcome>)>>
where
    G: GeometryProvider + Sync,
{
    let pool = build_pool(writer.grid())?;
    log::info!("Processing {} tiles on {} workers...", tiles.len(), pool.current_num_threads());

    let results = pool.install(|| {
        tiles
            .par_iter()
            .map(|&tile| {
                let result = writer.write_tile(tile);
                if let Err(error) = &result {
                    log::error!("{tile} failed: {error}");
                }
                (tile, result)
            })
            .collect()
    });

    Ok(results)
}

/// Worker pool sized by `grid.workers`
pub fn build_pool(grid: &GridConfig) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(grid.workers.max(1))
        .thread_name(|index| format!("tile-worker-{index}"))
        .build()
        .map_err(|error| Error::ThreadPool(error.to_string()))
}

/// Number of tiles that ended in an error
pub fn count_failures(results: &[(Tile, Result<TileOutcome>)]) -> usize {
    results.iter().filter(|(_, result)| result.is_err()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Airspace, AirspaceIndex, Altitude, Point, PointEncoder};
    use claims::assert_ok;

    #[test]
    fn pool_size_follows_grid_config() {
        let pool = assert_ok!(build_pool(&GridConfig::default().with_workers(3)));
        assert_eq!(pool.current_num_threads(), 3);

        let pool = assert_ok!(build_pool(&GridConfig::default().with_workers(0)));
        assert_eq!(pool.current_num_threads(), 1);
    }

    #[test]
    fn every_tile_gets_a_result_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let index = AirspaceIndex::new(vec![Airspace::new(
            "CTR",
            Altitude::agl(0),
            Altitude::msl(5000),
            &[
                Point::new(48.0, 9.0),
                Point::new(48.0, 9.2),
                Point::new(48.2, 9.2),
                Point::new(48.2, 9.0),
            ],
        )]);
        let writer = TileWriter::new(&index, PointEncoder::default(), dir.path())
            .with_grid(
                GridConfig::default()
                    .with_resolution(3)
                    .with_sample_resolution(2)
                    .with_workers(2),
            );

        let tiles = [Tile::new(48, 9), Tile::new(10, 10), Tile::new(47, 9)];
        let results = assert_ok!(run_tiles(&writer, &tiles));

        let order: Vec<_> = results.iter().map(|(tile, _)| *tile).collect();
        assert_eq!(order, tiles);
        assert_eq!(count_failures(&results), 0);
        assert!(matches!(results[0].1, Ok(TileOutcome::Saved(_))));
        assert!(matches!(results[1].1, Ok(TileOutcome::Empty)));
        assert!(matches!(results[2].1, Ok(TileOutcome::Saved(_))));
    }

    #[test]
    fn failing_tiles_do_not_affect_others() {
        let dir = tempfile::tempdir().unwrap();
        let square = |south: f64, west: f64, size: f64| {
            [
                Point::new(south, west),
                Point::new(south, west + size),
                Point::new(south + size, west + size),
                Point::new(south + size, west),
            ]
        };
        // Two stacked airspaces both containing 48.1/9.1, one level only
        let index = AirspaceIndex::new(vec![
            Airspace::new("LOW", Altitude::msl(0), Altitude::msl(1000), &square(48.0, 9.0, 0.2)),
            Airspace::new("HIGH", Altitude::msl(1000), Altitude::msl(2000), &square(47.9, 8.9, 0.4)),
        ]);
        let writer = TileWriter::new(
            &index,
            PointEncoder::new(crate::LevelConfig::default().with_levels(1)),
            dir.path(),
        )
        .with_grid(
            GridConfig::default()
                .with_resolution(10)
                .with_sample_resolution(0)
                .with_workers(2),
        );

        let tiles = [Tile::new(48, 9), Tile::new(10, 10)];
        let results = assert_ok!(run_tiles(&writer, &tiles));

        assert_eq!(count_failures(&results), 1);
        assert!(matches!(
            results[0].1,
            Err(Error::LevelBudgetExceeded { levels: 1, .. })
        ));
        assert!(matches!(results[1].1, Ok(TileOutcome::Empty)));
        assert!(!dir.path().join("N48E009.air").exists());
    }
}
