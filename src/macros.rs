// Patterns handed to this macro are literals checked by the unit tests
macro_rules! regex(
    ($s:expr) => (::regex::Regex::new($s).unwrap());
);
