//! Gender normalization.

use hcdw_model::Gender;

/// Maps a raw gender value to [`Gender`].
///
/// `M`/`MALE` and `F`/`FEMALE` match case-insensitively after trimming;
/// anything else, including blank and absent values, is [`Gender::Other`].
pub fn normalize_gender(value: Option<&str>) -> Gender {
    let Some(value) = value else {
        return Gender::Other;
    };
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("m") || trimmed.eq_ignore_ascii_case("male") {
        Gender::Male
    } else if trimmed.eq_ignore_ascii_case("f") || trimmed.eq_ignore_ascii_case("female") {
        Gender::Female
    } else {
        Gender::Other
    }
}
