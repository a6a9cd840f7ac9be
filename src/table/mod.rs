//! Columnar log files.
//!
//! A history or profile file is a small header of named scalars followed by
//! equal-length numeric columns:
//!
//! ```no_run
//! use steplog::table::{TabularLog, DEFAULT_KEY_COLUMN};
//!
//! let history = TabularLog::open("LOGS/history.data", DEFAULT_KEY_COLUMN)?;
//! let teff = history.value_at_key("log_Teff", 120.0)?;
//!
//! let hot = |v: &[f64]| v[0] > 3.8;
//! let rows = history.filter(&["log_Teff"], Some(&hot))?;
//! # let _ = (teff, rows);
//! # Ok::<(), steplog::Error>(())
//! ```

mod log;
pub mod prune;
mod value;

pub use self::log::{Field, TabularLog, DEFAULT_KEY_COLUMN};
pub use value::HeaderValue;
