pub mod change_log;
mod db;
pub mod employee;
pub mod island;
pub mod login;
pub mod logout;
pub mod office;
pub mod position_history;
pub mod role;
pub mod room;
pub mod testing;
pub mod user;
pub mod user_role;
pub mod workstation;

pub use db::*;

/// Escape character used by [`contains_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Builds a `LIKE` pattern matching `term` anywhere, with `%`, `_` and the
/// escape character itself taken literally. Use with
/// `.like(..).escape(LIKE_ESCAPE)`.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
