// Format modifiers of a single conversion specifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct FormattingInfo {
    pub(crate) left_justify: bool,
    pub(crate) min_width: Option<usize>,
    pub(crate) max_width: Option<usize>,
}
impl FormattingInfo {
    pub(crate) fn is_plain(&self) -> bool {
        self.min_width.is_none() && self.max_width.is_none()
    }

    // Appends value to buffer, truncated from the beginning and padded as configured.
    pub(crate) fn apply(&self, value: &str, buffer: &mut String) {
        let mut len = value.chars().count();
        let value = match self.max_width {
            Some(max) if len > max => {
                let skip = len - max;
                len = max;
                value
                    .char_indices()
                    .nth(skip)
                    .map_or("", |(idx, _)| &value[idx..])
            }
            _ => value,
        };
        let padding = self.min_width.map_or(0, |min| min.saturating_sub(len));
        if self.left_justify {
            buffer.push_str(value);
            buffer.extend(std::iter::repeat_n(' ', padding));
        } else {
            buffer.extend(std::iter::repeat_n(' ', padding));
            buffer.push_str(value);
        }
    }
}
