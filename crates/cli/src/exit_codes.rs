//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (unspecified)                      |
//! | 2    | Usage error (bad args, unknown kingdom)          |
//! | 3    | Scan parse error (no player rows in any input)   |
//! | 4    | Missing snapshot side (nothing could be scored)  |
//! | 5    | Invalid scoring config                           |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

/// No player rows could be extracted from any input file.
pub const EXIT_SCAN_PARSE: u8 = 3;

/// No kingdom had both snapshot sides after filtering.
pub const EXIT_MISSING_SNAPSHOT: u8 = 4;

/// Scoring config failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 5;
