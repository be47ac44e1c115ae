//! Field normalizers.
//!
//! Every function here is total: any input string yields a valid value of
//! the target shape, falling back to the `"unknown"` / `"0.00"` sentinels.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod identifiers;
pub mod patterns;

pub use amounts::{
    amount_to_number, equals_money, from_cents, is_money, normalize_amount, sum_amounts, sum_cents,
    to_cents,
};
pub use currency::{currency_in_amount, is_iso_currency, normalize_currency};
pub use dates::{find_iso_dates, is_iso_date, to_iso_date};
pub use identifiers::{clean_bank_name, clean_description, clean_identifier, is_known};
