use std::io::{self, Write};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();
const PREVIEW_ROWS: usize = 10;

/// Counts and a key preview shown after a command finishes.
pub struct SetSummary<'a> {
    pub title: &'a str,
    pub rows: Vec<(&'a str, String)>,
    pub keys: Vec<&'a str>,
}

pub fn print_summary(summary: &SetSummary<'_>) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    print_kv_table(&mut out, summary.title, &summary.rows);
    if !summary.keys.is_empty() {
        print_key_preview(&mut out, &summary.keys);
    }
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 20usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{k_line}┬{v_line}┐",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(
        out,
        "{}└{k_line}┴{v_line}┘",
        INDENT,
        k_line = "─".repeat(key_w + 2),
        v_line = "─".repeat(val_w + 2)
    );
}

fn print_key_preview(out: &mut impl Write, keys: &[&str]) {
    let idx_w = 5usize;
    let sep_overhead = 6;
    let key_w = SAFE_TABLE_WIDTH.saturating_sub(idx_w + sep_overhead);

    let _ = writeln!(out, "{}┌─ Canonical Keys ─┐", INDENT);
    let _ = writeln!(
        out,
        "{}┌{i_line}┬{k_line}┐",
        INDENT,
        i_line = "─".repeat(idx_w + 2),
        k_line = "─".repeat(key_w + 2)
    );
    for (i, key) in keys.iter().take(PREVIEW_ROWS).enumerate() {
        let _ = writeln!(
            out,
            "{}│ {:>idx_w$} │ {:<key_w$} │",
            INDENT,
            i,
            truncate(key, key_w),
        );
    }
    if keys.len() > PREVIEW_ROWS {
        let _ = writeln!(
            out,
            "{}│ {:>idx_w$} │ {:<key_w$} │",
            INDENT,
            "...",
            format!("({} more)", keys.len() - PREVIEW_ROWS),
        );
    }
    let _ = writeln!(
        out,
        "{}└{i_line}┴{k_line}┘",
        INDENT,
        i_line = "─".repeat(idx_w + 2),
        k_line = "─".repeat(key_w + 2)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_preview_lists_at_most_ten_rows() {
        let keys: Vec<String> = (0..12).map(|i| format!("C{i}")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();

        let mut buf = Vec::new();
        print_key_preview(&mut buf, &refs);
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("C9"));
        assert!(!text.contains("C10 "));
        assert!(text.contains("(2 more)"));
    }

    #[test]
    fn table_rows_keep_their_width() {
        let mut buf = Vec::new();
        print_kv_table(
            &mut buf,
            "Summary",
            &[("Records read", "12".to_string()), ("Unique", "7".to_string())],
        );
        let text = String::from_utf8(buf).unwrap();
        let widths: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|line| line.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
