/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 按空白拆分 `class` 属性
pub fn split_classes(class_attr: &str) -> impl Iterator<Item = &str> {
    class_attr
        .split(WHITESPACES)
        .filter(|class_name| !class_name.is_empty())
}
