/// Process exit codes of the `tsfile` binary
pub const SUCCESS: i32 = 0;
/// Input file missing, unreadable, or not a valid `.ts` file
pub const INPUT_ERROR: i32 = 1;
/// Failure producing output (serialization, writing files)
pub const EXECUTION_ERROR: i32 = 2;
/// Some files in a multi-file run were invalid
pub const PARTIAL_FAILURE: i32 = 3;
