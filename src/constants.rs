pub const DEFAULT_ADDR: &str = "[::1]:50051";
pub const DEFAULT_WORKDIR: &str = "..";
pub const DEFAULT_BINARY: &str = "./orderbook";
pub const DEFAULT_BUILD_TOOL: &str = "make";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ADDR_ENV: &str = "ACTIONRUNNER_ADDR";
pub const WORKDIR_ENV: &str = "ACTIONRUNNER_WORKDIR";
pub const BINARY_ENV: &str = "ACTIONRUNNER_BINARY";
pub const BUILD_TOOL_ENV: &str = "ACTIONRUNNER_BUILD_TOOL";
pub const LOG_ENV: &str = "ACTIONRUNNER_LOG";
pub const DRY_RUN_ENV: &str = "ACTIONRUNNER_DRY_RUN";

pub const SYMBOLS_PARAM: &str = "symbols";
pub const START_TIMESTAMP_PARAM: &str = "start_timestamp";
pub const END_TIMESTAMP_PARAM: &str = "end_timestamp";
pub const FIELDS_PARAM: &str = "fields";

// Short names posted by the query form.
pub const START_TS_ALIAS: &str = "start_ts";
pub const END_TS_ALIAS: &str = "end_ts";
