/// Data layer: core types, loading, filtering and paging.
///
/// Architecture:
/// ```text
///  chicago.csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TripDataset (records + schema)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  month / weekday predicates → FilteredView
///   └──────────┘
///        │
///        ├──────────────► stats (read-only)
///        ▼
///   ┌──────────┐
///   │  pager    │  5-record pages by caller-owned cursor
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod pager;
