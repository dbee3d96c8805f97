pub fn clip_for_log(value: &str, max_bytes: usize) -> String {
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [{} bytes total]", &value[..end], value.len())
}

#[cfg(test)]
mod tests {
    use super::clip_for_log;

    #[test]
    fn short_values_pass_through() {
        assert_eq!(clip_for_log("hello", 16), "hello");
    }

    #[test]
    fn long_values_are_marked() {
        assert_eq!(clip_for_log("hello world", 5), "hello... [11 bytes total]");
    }

    #[test]
    fn clipping_does_not_split_utf8() {
        assert_eq!(clip_for_log("ač", 2), "a... [3 bytes total]");
    }
}
