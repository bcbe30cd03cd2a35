//! # Snapshot Testing Support
//!
//! Utilities for testing the parse pipeline via snapshot assertions and
//! invariant checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Renders a syntax tree as a stable, indented outline for
//!   `insta` snapshot testing
//! - **`invariants`**: Runtime checks for pipeline correctness (spans in
//!   bounds, sections never nested in sections, no `\end` left behind)
//!
//! ## Testing Strategy
//!
//! Tree-level behavior is pinned by outline snapshots rather than by
//! asserting on individual nodes. Spans are left out of the outline; the
//! invariant checker covers them instead.

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::outline;
