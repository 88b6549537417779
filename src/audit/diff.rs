//! Line-based unified diff
//!
//! Produces a single full-context hunk between two versions of a file, so
//! both versions can be rebuilt from the diff alone. Lines are aligned on a
//! longest common subsequence after trimming the shared prefix and suffix.

/// Label for the `---` header
pub const PREVIOUS_LABEL: &str = "previous version";
/// Label for the `+++` header
pub const CURRENT_LABEL: &str = "current version";

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file\n";

/// Above this many LCS table cells the changed region is emitted as a
/// block removal followed by a block addition
const MAX_LCS_CELLS: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffOp<'a> {
    Equal(&'a str),
    Delete(&'a str),
    Insert(&'a str),
}

/// Split text into lines, keeping each line's terminator (`\n`, `\r\n` or `\r`)
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..=i]);
                start = i + 1;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') { i + 1 } else { i };
                lines.push(&text[start..=end]);
                i = end;
                start = end + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Compute a unified diff with context covering both inputs entirely
///
/// Returns an empty vector when the inputs are equal. Otherwise the output
/// is the `---`/`+++` header pair, one `@@` hunk header, and every line of
/// both versions prefixed with `' '`, `'-'` or `'+'`.
pub fn unified_diff(previous: &[&str], current: &[&str]) -> Vec<String> {
    let ops = align(previous, current);
    if ops.iter().all(|op| matches!(op, DiffOp::Equal(_))) {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(ops.len() + 3);
    out.push(format!("--- {}\n", PREVIOUS_LABEL));
    out.push(format!("+++ {}\n", CURRENT_LABEL));
    out.push(format!(
        "@@ -{} +{} @@\n",
        format_range(previous.len()),
        format_range(current.len())
    ));

    for op in ops {
        let (prefix, line) = match op {
            DiffOp::Equal(line) => (' ', line),
            DiffOp::Delete(line) => ('-', line),
            DiffOp::Insert(line) => ('+', line),
        };
        if has_terminator(line) {
            out.push(format!("{}{}", prefix, line));
        } else {
            out.push(format!("{}{}\n", prefix, line));
            out.push(NO_NEWLINE_MARKER.to_string());
        }
    }

    out
}

/// Rebuild `(previous, current)` from a full-context diff
///
/// Everything up to and including the `@@` header is skipped. Context
/// lines go to both sides, `-` lines to the previous side, `+` lines to the
/// current side.
pub fn reconstruct<S: AsRef<str>>(diff: &[S]) -> (String, String) {
    let mut previous = String::new();
    let mut current = String::new();
    let mut last_prefix = ' ';

    let body = diff
        .iter()
        .skip_while(|line| !AsRef::<str>::as_ref(*line).starts_with("@@ "))
        .skip(1);

    for line in body {
        let line: &str = line.as_ref();
        if line == NO_NEWLINE_MARKER {
            if last_prefix != '+' {
                previous.pop();
            }
            if last_prefix != '-' {
                current.pop();
            }
            continue;
        }

        let mut chars = line.chars();
        let prefix = chars.next().unwrap_or(' ');
        let body = chars.as_str();
        match prefix {
            ' ' => {
                previous.push_str(body);
                current.push_str(body);
            }
            '-' => previous.push_str(body),
            '+' => current.push_str(body),
            _ => continue,
        }
        last_prefix = prefix;
    }

    (previous, current)
}

fn has_terminator(line: &str) -> bool {
    line.ends_with('\n') || line.ends_with('\r')
}

/// Unified-diff range: `start,len`, just `start` for one line, `start-1,0`
/// for none. The hunk always begins at the first line.
fn format_range(len: usize) -> String {
    match len {
        0 => "0,0".to_string(),
        1 => "1".to_string(),
        n => format!("1,{}", n),
    }
}

fn align<'a>(previous: &[&'a str], current: &[&'a str]) -> Vec<DiffOp<'a>> {
    let prefix = previous
        .iter()
        .zip(current)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = previous[prefix..]
        .iter()
        .rev()
        .zip(current[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &previous[prefix..previous.len() - suffix];
    let new_mid = &current[prefix..current.len() - suffix];

    let mut ops: Vec<DiffOp<'a>> = previous[..prefix]
        .iter()
        .map(|l| DiffOp::Equal(*l))
        .collect();
    ops.extend(align_middle(old_mid, new_mid));
    ops.extend(
        previous[previous.len() - suffix..]
            .iter()
            .map(|l| DiffOp::Equal(*l)),
    );
    ops
}

fn align_middle<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffOp<'a>> {
    let (n, m) = (old.len(), new.len());
    let cells = (n + 1).saturating_mul(m + 1);

    if n == 0 || m == 0 || cells > MAX_LCS_CELLS {
        let mut ops: Vec<DiffOp<'a>> = old.iter().map(|l| DiffOp::Delete(*l)).collect();
        ops.extend(new.iter().map(|l| DiffOp::Insert(*l)));
        return ops;
    }

    // lcs[i * (m + 1) + j] = LCS length of old[i..] and new[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; cells];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if old[i] == new[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            ops.push(DiffOp::Equal(old[i]));
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            ops.push(DiffOp::Delete(old[i]));
            i += 1;
        } else {
            ops.push(DiffOp::Insert(new[j]));
            j += 1;
        }
    }
    ops.extend(old[i..].iter().map(|l| DiffOp::Delete(*l)));
    ops.extend(new[j..].iter().map(|l| DiffOp::Insert(*l)));
    ops
}
