//! SQL scalar functions backing the proximity predicate.

use rusqlite::{Connection, functions::FunctionFlags};
use tigerwatch_core::geo::{GeoPoint, haversine_meters};

/// Name of the registered `haversine_m(lat1, lon1, lat2, lon2)` function.
pub const HAVERSINE_FN: &str = "haversine_m";

/// Register `haversine_m` on `conn`. It yields NULL when any argument is
/// NULL, so optional filters can be written as `?n IS NULL OR ...`.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    HAVERSINE_FN,
    4,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let args = (
        ctx.get::<Option<f64>>(0)?,
        ctx.get::<Option<f64>>(1)?,
        ctx.get::<Option<f64>>(2)?,
        ctx.get::<Option<f64>>(3)?,
      );
      Ok(match args {
        (Some(lat1), Some(lon1), Some(lat2), Some(lon2)) => Some(haversine_meters(
          GeoPoint { lat: lat1, lon: lon1 },
          GeoPoint { lat: lat2, lon: lon2 },
        )),
        _ => None,
      })
    },
  )
}
