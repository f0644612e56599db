/*!
 * Serde Helper Functions
 *
 * Timestamps go over the wire as milliseconds since the UNIX epoch, which is
 * what the dashboard's `new Date(ms)` expects. Use the serde_with adapters:
 *
 * ```ignore
 * #[serde_as]
 * #[derive(Serialize)]
 * struct Record {
 *     #[serde_as(as = "TimestampMilliSeconds<i64>")]
 *     timestamp: SystemTime,
 * }
 * ```
 */

pub use serde_with::{serde_as, skip_serializing_none, TimestampMilliSeconds};
