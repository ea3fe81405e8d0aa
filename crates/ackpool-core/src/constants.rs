//! Constants for calculator selection and process exit codes.

/// Calculator names accepted by the default factory, in presentation order.
pub const CALCULATOR_NAMES: [&str; 3] = ["pooled", "recursive", "boxed"];

/// Number of recursive calls (operation starts) needed for f(3, 3).
pub const STARTS_3_3: u64 = 2432;

/// Largest f(m, n) the native-stack baselines are run on. Their stack depth
/// grows with the value, so larger results overflow a 2 MiB thread stack.
pub const BASELINE_MAX_VALUE: u64 = 2048;

/// Exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Calculator results did not match during cross-validation.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
    /// The operation protocol was violated.
    pub const ERROR_PROTOCOL: i32 = 5;
}
