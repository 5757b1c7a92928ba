// Tests spanning several modules, grouped by concern.

mod errors;
