/// Data file shared by the crawler and both search front ends.
pub const DEFAULT_DATA_PATH: &str = "data/courses_data.json";

/// Environment variable every binary reads to override [`DEFAULT_DATA_PATH`].
pub const DATA_PATH_ENV: &str = "COURSES_DATA_PATH";
