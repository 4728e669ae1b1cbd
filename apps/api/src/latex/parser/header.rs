use regex::Regex;
use std::sync::LazyLock;

use crate::latex::escape::unescape_latex;
use crate::latex::parser::blocks::RE_LINE_BREAK;
use crate::latex::scan::{
    balanced_group, environments, find_command, find_commands, plain, remove_commands,
    remove_environments, separators, skip_whitespace, take_run,
};
use crate::models::resume::{PersonalInfo, ProfileLink};

/// Inline contact delimiters, all folded to `|` before splitting.
pub(super) static RE_DELIMITERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\$\\bullet\$|\$\|\$|\$\\cdot\$|\\textbullet(?:\{\})?|\\textbar(?:\{\})?|\\textperiodcentered(?:\{\})?|\\bullet|\\cdot|\\AND|\\quad|•|·",
    )
    .unwrap()
});

static RE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:e-?mail|phone|mobile|tel|cell|location|address)\s*:\s*").unwrap()
});

/// Font-size switches that usually introduce the name, largest first.
const NAME_SIZES: &[(&str, usize)] = &[
    ("Huge", 0),
    ("huge", 0),
    ("LARGE", 0),
    ("Large", 0),
    ("fontsize", 2),
];

/// Reads the name and contact details from the text before the first section.
pub(super) fn parse_header(region: &str) -> PersonalInfo {
    let region = remove_environments(region, &["tikzpicture"]);
    let centered = environments(&region, &["center"]);
    let scope = centered.first().map(|env| env.inner).unwrap_or(&region);

    let name = name_from_size(scope)
        .or_else(|| name_from_bold(scope))
        .or_else(|| name_from_first_line(scope))
        .unwrap_or_default();

    let mut info = PersonalInfo {
        name,
        ..PersonalInfo::default()
    };
    read_contacts(scope, &mut info);
    info
}

fn name_from_size(scope: &str) -> Option<String> {
    for (command, arity) in NAME_SIZES {
        for found in find_commands(scope, command, *arity) {
            if found.args.len() < *arity {
                continue;
            }
            let next = skip_whitespace(scope, found.end);
            let text = match balanced_group(scope, next) {
                Some((inner, _)) if *arity == 0 => plain(inner),
                _ => plain(take_run(scope, found.end)),
            };
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn name_from_bold(scope: &str) -> Option<String> {
    find_command(scope, "textbf", 1)
        .and_then(|cmd| cmd.args.first().map(|arg| plain(arg)))
        .filter(|text| !text.is_empty())
}

fn name_from_first_line(scope: &str) -> Option<String> {
    RE_LINE_BREAK
        .split(scope)
        .map(plain)
        .find(|text| !text.is_empty() && !text.contains('@') && !looks_like_phone(text))
}

fn read_contacts(scope: &str, info: &mut PersonalInfo) {
    let normalized = RE_DELIMITERS.replace_all(scope, "|");
    for line in RE_LINE_BREAK.split(&normalized) {
        for column in split_at_separators(line) {
            for part in column.split('|') {
                read_part(part, info);
            }
        }
    }
}

fn split_at_separators(line: &str) -> Vec<&str> {
    let mut columns = Vec::new();
    let mut last = 0;
    for (start, end) in separators(line) {
        columns.push(&line[last..start]);
        last = end;
    }
    columns.push(&line[last..]);
    columns
}

fn read_part(part: &str, info: &mut PersonalInfo) {
    let links = find_commands(part, "href", 2);
    for link in &links {
        if let [url, text] = link.args[..] {
            read_link(&unescape_latex(url.trim()), &plain(text), info);
        }
    }
    let rest = if links.is_empty() {
        plain(part)
    } else {
        plain(&remove_commands(part, "href", 2))
    };
    read_text(&rest, info);
}

fn read_link(url: &str, text: &str, info: &mut PersonalInfo) {
    if let Some(address) = url.strip_prefix("mailto:") {
        if info.email.is_empty() {
            info.email = if text.is_empty() { address.to_string() } else { text.to_string() };
        }
    } else if let Some(number) = url.strip_prefix("tel:") {
        if info.phone.is_empty() {
            info.phone = if text.is_empty() { number.to_string() } else { text.to_string() };
        }
    } else if !url.is_empty() || !text.is_empty() {
        info.profiles.push(ProfileLink {
            network: network_for(url).to_string(),
            label: if text.is_empty() { url.to_string() } else { text.to_string() },
            url: url.to_string(),
        });
    }
}

fn read_text(text: &str, info: &mut PersonalInfo) {
    let text = RE_LABEL.replace(text, "");
    let text = text.trim();
    if text.is_empty() || text.ends_with(':') || text.eq_ignore_ascii_case(&info.name) {
        return;
    }

    if text.contains('@') && !text.contains(' ') {
        if info.email.is_empty() {
            info.email = text.trim_start_matches("mailto:").to_string();
        }
    } else if looks_like_phone(text) {
        if info.phone.is_empty() {
            info.phone = text.to_string();
        }
    } else if text.starts_with("http") || text.contains("linkedin.com") || text.contains("github.com") {
        let url = if text.starts_with("http") {
            text.to_string()
        } else {
            format!("https://{text}")
        };
        info.profiles.push(ProfileLink {
            network: network_for(&url).to_string(),
            label: text.to_string(),
            url,
        });
    } else if info.location.is_empty() && text.chars().count() > 2 {
        info.location = text.to_string();
    }
}

fn looks_like_phone(text: &str) -> bool {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    digits >= 7 && text.chars().all(|c| c.is_ascii_digit() || " +-().".contains(c))
}

/// Guesses the network from a profile URL.
pub(super) fn network_for(url: &str) -> &'static str {
    let url = url.to_lowercase();
    if url.contains("linkedin") {
        "LinkedIn"
    } else if url.contains("github") {
        "GitHub"
    } else if url.contains("gitlab") {
        "GitLab"
    } else if url.contains("twitter.com") || url.contains("//x.com") || url.contains("www.x.com") {
        "Twitter"
    } else if url.contains("portfolio") {
        "Portfolio"
    } else {
        "Website"
    }
}
