use crate::key_define::Define;

/// Version header every assembled shader starts with.
pub const SHADER_PREFIX: &str = "#version 450\n";

/// One `#define` line per define, each newline-terminated.
pub fn define_block(defines: &[Define]) -> String {
    let mut block = String::new();
    for define in defines {
        block.push_str(&define.directive());
        block.push('\n');
    }
    block
}

/// Assemble a compilable shader: version header, defines, then the body.
///
/// Returns `None` for empty input. A source that already starts with the
/// version header (and with the same define block) is unwrapped first, so
/// wrapping twice yields the same text as wrapping once.
pub fn build_shader_source(source: &str, defines: &[Define]) -> Option<String> {
    if source.is_empty() {
        return None;
    }
    let block = define_block(defines);
    let body = match source.strip_prefix(SHADER_PREFIX) {
        Some(rest) => rest.strip_prefix(block.as_str()).unwrap_or(rest),
        None => source,
    };
    Some(format!("{SHADER_PREFIX}{block}{body}"))
}

/// Prefix every line with its 1-based number, for diagnostics.
pub fn number_lines(source: &str) -> String {
    source
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}: {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
