//! Brace-aware scanning primitives over LaTeX source.
//!
//! Everything here works on byte offsets. The bytes we branch on (`\`, `{`,
//! `}`, `[`, `]`, `&`, `$`, `%`, newline) are ASCII and never occur inside a
//! multi-byte UTF-8 sequence, so every offset we slice at is a char boundary.

use crate::latex::escape::unescape_latex;

/// Commands whose leading brace arguments are layout parameters rather than text.
/// Any arguments past the listed count are treated as ordinary groups.
const PARAMETER_ARGS: &[(&str, usize)] = &[
    ("addtolength", 2),
    ("color", 1),
    ("colorbox", 1),
    ("definecolor", 3),
    ("extracolsep", 1),
    ("fcolorbox", 2),
    ("fontsize", 2),
    ("href", 1),
    ("hspace", 1),
    ("includegraphics", 1),
    ("multicolumn", 2),
    ("parbox", 1),
    ("raisebox", 1),
    ("rule", 2),
    ("setlength", 2),
    ("textcolor", 1),
    ("vspace", 1),
];

/// Arguments that follow `\begin{name}` for environments that take them.
const ENVIRONMENT_ARGS: &[(&str, usize)] = &[
    ("minipage", 1),
    ("multicols", 1),
    ("tabular", 1),
    ("tabular*", 2),
    ("tabularx", 2),
];

/// Text-producing commands that must survive stripping so `unescape_latex` can map them.
const KEPT_COMMANDS: &[&str] = &["textbackslash", "textasciitilde", "textasciicircum"];

/// Characters that form an escape sequence when preceded by a backslash.
const ESCAPED_SYMBOLS: &[u8] = b"&%$#_{}";

/// A located command with its brace arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command<'a> {
    /// Offset of the backslash.
    pub start: usize,
    /// Offset just past the last consumed argument.
    pub end: usize,
    pub args: Vec<&'a str>,
}

/// A located environment. `inner` excludes the `\begin{..}` arguments and the `\end{..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment<'a> {
    pub name: &'a str,
    pub start: usize,
    pub end: usize,
    pub inner: &'a str,
}

/// Removes `%` comments, keeping escaped `\%`.
pub fn strip_comments(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    let mut copy_from = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'%' => {
                out.push_str(&src[copy_from..i]);
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                copy_from = i;
            }
            _ => i += 1,
        }
    }
    out.push_str(&src[copy_from.min(src.len())..]);
    out
}

/// Given the offset of a `{`, returns the group's inner text and the offset past its `}`.
pub fn balanced_group(src: &str, open: usize) -> Option<(&str, usize)> {
    let bytes = src.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&src[open + 1..i], i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

pub fn skip_whitespace(src: &str, mut i: usize) -> usize {
    let bytes = src.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Skips a `[...]` optional argument starting at `i`, if there is one.
pub fn skip_optional(src: &str, i: usize) -> usize {
    let bytes = src.as_bytes();
    if bytes.get(i) != Some(&b'[') {
        return i;
    }
    let mut depth = 0usize;
    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => {
                j += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b']' if depth == 0 => return j + 1,
            _ => {}
        }
        j += 1;
    }
    i
}

/// Reads a control word starting right after a backslash. Returns the name and the offset after it.
fn read_name(src: &str, from: usize) -> (&str, usize) {
    let bytes = src.as_bytes();
    let mut j = from;
    while j < bytes.len() && bytes[j].is_ascii_alphabetic() {
        j += 1;
    }
    (&src[from..j], j)
}

/// Collects up to `arity` brace arguments starting at `from`, skipping
/// whitespace and optional `[...]` arguments in between.
fn collect_args(src: &str, from: usize, arity: usize) -> (Vec<&str>, usize) {
    let mut args = Vec::with_capacity(arity);
    let mut end = from;
    while args.len() < arity {
        let j = skip_whitespace(src, end);
        let j = skip_optional(src, j);
        let j = skip_whitespace(src, j);
        match balanced_group(src, j) {
            Some((inner, after)) => {
                args.push(inner);
                end = after;
            }
            None => break,
        }
    }
    (args, end)
}

/// Finds every `\name` (with optional `*`) and up to `arity` brace arguments.
pub fn find_commands<'a>(src: &'a str, name: &str, arity: usize) -> Vec<Command<'a>> {
    let bytes = src.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let (word, after) = read_name(src, i + 1);
        if word.is_empty() {
            i += 2;
            continue;
        }
        if word == name {
            let after_star = if bytes.get(after) == Some(&b'*') { after + 1 } else { after };
            let (args, end) = collect_args(src, after_star, arity);
            found.push(Command {
                start: i,
                end,
                args,
            });
            i = after_star;
        } else {
            i = after;
        }
    }
    found
}

pub fn find_command<'a>(src: &'a str, name: &str, arity: usize) -> Option<Command<'a>> {
    find_commands(src, name, arity).into_iter().next()
}

/// Removes every occurrence of `\name` together with its arguments.
pub fn remove_commands(src: &str, name: &str, arity: usize) -> String {
    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for cmd in find_commands(src, name, arity) {
        out.push_str(&src[last..cmd.start]);
        last = cmd.end;
    }
    out.push_str(&src[last..]);
    out
}

/// Returns the text from `from` up to the end of the enclosing group, a line
/// break (`\\` or newline) or a tabular `&`, whichever comes first.
pub fn take_run(src: &str, from: usize) -> &str {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if depth == 0 && bytes.get(i + 1) == Some(&b'\\') => break,
            b'\\' => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' if depth == 0 => break,
            b'}' => depth -= 1,
            b'\n' | b'&' if depth == 0 => break,
            _ => {}
        }
        i += 1;
    }
    &src[from..i.min(bytes.len())]
}

/// Finds outermost environments whose name is in `names`.
pub fn environments<'a>(src: &'a str, names: &[&str]) -> Vec<Environment<'a>> {
    let mut found = Vec::new();
    let mut open: Option<(&'a str, usize, usize)> = None;
    let mut depth = 0usize;

    let mut markers: Vec<(usize, bool, &'a str, usize)> = Vec::new();
    for cmd in find_commands(src, "begin", 1) {
        if let Some(name) = cmd.args.first().copied() {
            markers.push((cmd.start, true, name, cmd.end));
        }
    }
    for cmd in find_commands(src, "end", 1) {
        if let Some(name) = cmd.args.first().copied() {
            markers.push((cmd.start, false, name, cmd.end));
        }
    }
    markers.sort_by_key(|m| m.0);

    for (start, is_begin, name, end) in markers {
        if !names.contains(&name) {
            continue;
        }
        if is_begin {
            if depth == 0 {
                let inner_start = skip_environment_args(src, name, end);
                open = Some((name, start, inner_start));
            }
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                if let Some((open_name, env_start, inner_start)) = open.take() {
                    found.push(Environment {
                        name: open_name,
                        start: env_start,
                        end,
                        inner: &src[inner_start.min(start)..start],
                    });
                }
            }
        }
    }
    found
}

fn skip_environment_args(src: &str, name: &str, after_name: usize) -> usize {
    let arity = ENVIRONMENT_ARGS
        .iter()
        .find(|(env, _)| *env == name)
        .map(|(_, n)| *n)
        .unwrap_or(0);
    let (_, end) = collect_args(src, after_name, arity);
    // Lists take an optional `[...]` right after the name.
    let j = skip_whitespace(src, end);
    let skipped = skip_optional(src, j);
    if skipped != j {
        skipped
    } else {
        end
    }
}

/// Removes the environments named in `names` (including their content).
pub fn remove_environments(src: &str, names: &[&str]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for env in environments(src, names) {
        out.push_str(&src[last..env.start]);
        last = env.end;
    }
    out.push_str(&src[last..]);
    out
}

/// Removes `\begin{..}` (with its environment arguments) and `\end{..}` markers,
/// keeping the content between them. Each marker becomes a newline.
pub fn strip_environment_markers(src: &str) -> String {
    let mut markers: Vec<(usize, usize)> = find_commands(src, "begin", 1)
        .into_iter()
        .map(|cmd| {
            let end = match cmd.args.first() {
                Some(name) => skip_environment_args(src, name, cmd.end),
                None => cmd.end,
            };
            (cmd.start, end)
        })
        .chain(find_commands(src, "end", 1).into_iter().map(|cmd| (cmd.start, cmd.end)))
        .collect();
    markers.sort_unstable();

    let mut out = String::with_capacity(src.len());
    let mut last = 0;
    for (start, end) in markers {
        if start < last {
            continue;
        }
        out.push_str(&src[last..start]);
        out.push('\n');
        last = end;
    }
    out.push_str(&src[last..]);
    out
}

/// Splits list content on `\item` markers at nesting depth zero.
pub fn list_items(inner: &str) -> Vec<&str> {
    let bytes = inner.as_bytes();
    let mut items = Vec::new();
    let mut current: Option<usize> = None;
    let mut brace_depth = 0usize;
    let mut env_depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => brace_depth += 1,
            b'}' => brace_depth = brace_depth.saturating_sub(1),
            b'\\' => {
                let (word, after) = read_name(inner, i + 1);
                match word {
                    "" => {
                        i += 2;
                        continue;
                    }
                    "begin" => env_depth += 1,
                    "end" => env_depth = env_depth.saturating_sub(1),
                    "item" if brace_depth == 0 && env_depth == 0 => {
                        if let Some(start) = current {
                            items.push(&inner[start..i]);
                        }
                        current = Some(skip_optional(inner, after));
                    }
                    _ => {}
                }
                i = after;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    if let Some(start) = current {
        items.push(&inner[start.min(inner.len())..]);
    }
    items
}

/// Offsets of column separators at brace depth zero: unescaped `&` and `\hfill`.
pub fn separators(line: &str) -> Vec<(usize, usize)> {
    let bytes = line.as_bytes();
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let (word, after) = read_name(line, i + 1);
                if word.is_empty() {
                    i += 2;
                    continue;
                }
                if word == "hfill" && depth == 0 {
                    found.push((i, after));
                }
                i = after;
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'&' if depth == 0 => found.push((i, i + 1)),
            _ => {}
        }
        i += 1;
    }
    found
}

/// If `line` starts (after whitespace, `{`, `\item` and font switches) with
/// `\name{...}`, returns the argument and the remainder of the line.
pub fn leading_command<'a>(line: &'a str, name: &str) -> Option<(&'a str, &'a str)> {
    const PREFIXES: &[&str] = &[
        "item", "noindent", "small", "normalsize", "large", "footnotesize", "centering",
    ];
    let bytes = line.as_bytes();
    let mut i = 0;
    loop {
        i = skip_whitespace(line, i);
        match bytes.get(i) {
            Some(b'{') => i += 1,
            Some(b'\\') => {
                let (word, after) = read_name(line, i + 1);
                if word == name {
                    let j = skip_whitespace(line, after);
                    let (inner, end) = balanced_group(line, j)?;
                    return Some((inner, &line[end..]));
                }
                if PREFIXES.contains(&word) {
                    i = after;
                } else {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Byte ranges of each line (newline excluded).
pub fn line_spans(src: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (i, b) in src.bytes().enumerate() {
        if b == b'\n' {
            spans.push((start, i));
            start = i + 1;
        }
    }
    spans.push((start, src.len()));
    spans
}

/// Strips markup but keeps escape sequences, so the result can be unescaped.
pub fn strip_markup(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i = strip_command(src, i, &mut out),
            b'{' | b'}' | b'$' => i += 1,
            b'&' | b'~' => {
                out.push(' ');
                i += 1;
            }
            b'%' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            _ => {
                let start = i;
                while i < bytes.len() && !b"\\{}$&~%".contains(&bytes[i]) {
                    i += 1;
                }
                out.push_str(&src[start..i]);
            }
        }
    }
    out
}

/// Handles the command starting at the backslash at `i`. Returns the offset to resume at.
fn strip_command(src: &str, i: usize, out: &mut String) -> usize {
    let bytes = src.as_bytes();
    let (word, after) = read_name(src, i + 1);

    if word.is_empty() {
        return match bytes.get(i + 1) {
            Some(b'\\') => {
                out.push(' ');
                let j = if bytes.get(i + 2) == Some(&b'*') { i + 3 } else { i + 2 };
                skip_optional(src, j)
            }
            Some(c) if ESCAPED_SYMBOLS.contains(c) => {
                out.push('\\');
                out.push(*c as char);
                i + 2
            }
            Some(b',' | b' ' | b';' | b':' | b'\n') => {
                out.push(' ');
                i + 2
            }
            Some(c) if c.is_ascii_punctuation() => i + 2,
            _ => i + 1,
        };
    }

    if KEPT_COMMANDS.contains(&word) {
        out.push_str(&src[i..after]);
        if src[after..].starts_with("{}") {
            out.push_str("{}");
            return after + 2;
        }
        return after;
    }

    match word {
        "begin" => {
            let (args, end) = collect_args(src, after, 1);
            match args.first() {
                Some(name) => skip_environment_args(src, name, end),
                None => end,
            }
        }
        "end" => collect_args(src, after, 1).1,
        _ => {
            out.push(' ');
            let arity = PARAMETER_ARGS
                .iter()
                .find(|(name, _)| *name == word)
                .map(|(_, n)| *n)
                .unwrap_or(0);
            if arity == 0 {
                after
            } else {
                collect_args(src, after, arity).1
            }
        }
    }
}

/// Plain, unescaped, whitespace-collapsed text of a LaTeX fragment.
pub fn plain(src: &str) -> String {
    let stripped = strip_markup(src);
    unescape_latex(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_group_skips_escaped_braces() {
        let src = r"\textbf{a \{ b} tail";
        let (inner, end) = balanced_group(src, 7).unwrap();
        assert_eq!(inner, r"a \{ b");
        assert_eq!(&src[end..], " tail");
    }

    #[test]
    fn test_balanced_group_nested() {
        let src = r"{\textbf{\Huge x}}";
        assert_eq!(balanced_group(src, 0).unwrap().0, r"\textbf{\Huge x}");
        assert!(balanced_group("{unclosed", 0).is_none());
    }

    #[test]
    fn test_find_commands_with_star_and_spacing() {
        let src = "\\resumeSubheading\n  {A}{B}\n  {C}{D}\n\\section*{Skills}";
        let cmds = find_commands(src, "resumeSubheading", 4);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].args, vec!["A", "B", "C", "D"]);

        let sections = find_commands(src, "section", 1);
        assert_eq!(sections[0].args, vec!["Skills"]);
    }

    #[test]
    fn test_find_commands_respects_name_boundary() {
        let src = r"\sectiontitle{A} \section{B}";
        let cmds = find_commands(src, "section", 1);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].args, vec!["B"]);
    }

    #[test]
    fn test_strip_comments_keeps_escaped_percent() {
        assert_eq!(strip_comments("50\\% done % note\nnext"), "50\\% done \nnext");
    }

    #[test]
    fn test_take_run_stops_at_group_end_and_breaks() {
        let src = r"\Huge Alex Coder \vspace{2pt}} & rest";
        assert_eq!(take_run(src, 5), r" Alex Coder \vspace{2pt}");
        let src = r"\selectfont \textbf{Sam}\\ next";
        assert_eq!(take_run(src, 0), r"\selectfont \textbf{Sam}");
    }

    #[test]
    fn test_environments_and_items() {
        let src = "\\begin{itemize}[nosep, label={--}]\n\\item One \\& two\n\\item Two \\begin{itemize}\\item nested\\end{itemize}\n\\end{itemize}";
        let envs = environments(src, &["itemize"]);
        assert_eq!(envs.len(), 1);
        let items = list_items(envs[0].inner);
        assert_eq!(items.len(), 2);
        assert_eq!(plain(items[0]), "One & two");
        assert_eq!(plain(items[1]), "Two nested");
    }

    #[test]
    fn test_separators_ignore_escaped_and_nested() {
        let line = r"\textbf{R\&D} & \hfill & {a & b} Jan 2020";
        let seps = separators(line);
        assert_eq!(seps.len(), 3);
        assert_eq!(&line[seps[1].0..seps[1].1], r"\hfill");
    }

    #[test]
    fn test_leading_command_skips_prefixes() {
        let (inner, rest) = leading_command(r"  \item {\small \textbf{Title}} \hfill x", "textbf").unwrap();
        assert_eq!(inner, "Title");
        assert_eq!(rest, r"} \hfill x");
        assert!(leading_command(r"\textit{x} \textbf{y}", "textbf").is_none());
    }

    #[test]
    fn test_plain_drops_layout_and_keeps_text() {
        assert_eq!(plain(r"{\color{primary}\footnotesize Jan 2020 -- Present}"), "Jan 2020 -- Present");
        assert_eq!(plain(r"\fontsize{20pt}{20pt}\selectfont \textbf{Sam Lee}\\"), "Sam Lee");
        assert_eq!(plain(r"\href{https://x.io}{Site} \hspace{0.1cm} \faLink"), "Site");
        assert_eq!(plain(r"\begin{minipage}[t]{0.4\textwidth}"), "");
        assert_eq!(plain(r"\Huge{John Doe} \\[7.5pt]"), "John Doe");
        assert_eq!(plain(r"C:\textbackslash{}dir \& 100\%"), r"C:\dir & 100%");
    }

    #[test]
    fn test_remove_commands() {
        assert_eq!(remove_commands(r"a \href{u}{b} c", "href", 2), "a  c");
    }

    #[test]
    fn test_strip_environment_markers_keeps_content() {
        let src = "\\begin{itemize}[leftmargin=*, label={}]\\item a\\end{itemize}\\begin{minipage}[t]{0.4\\textwidth}b";
        assert_eq!(strip_environment_markers(src), "\n\\item a\n\nb");
    }

    #[test]
    fn test_remove_environments() {
        let src = "x\\begin{tikzpicture}\\fill (0,0) circle (1cm);\\end{tikzpicture}y";
        assert_eq!(remove_environments(src, &["tikzpicture"]), "xy");
    }
}
