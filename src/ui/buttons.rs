//! Central button construction helpers so labels stay within platform limits.
use crate::constants::MAX_BUTTON_LABEL_CHARS;
use crate::transport::Button;
use crate::util::truncate_chars;

pub struct Btn;
impl Btn {
    pub fn go(label: &str, data: &str) -> Button {
        Button::callback(truncate_chars(label, MAX_BUTTON_LABEL_CHARS), data)
    }
    pub fn link(label: &str, url: &str) -> Button {
        Button::url(truncate_chars(label, MAX_BUTTON_LABEL_CHARS), url)
    }
}
