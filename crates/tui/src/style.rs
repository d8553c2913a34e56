use crossterm::style::{Attribute, Color, ContentStyle};

/// Parses a style string such as `"bold magenta"`, `"italic #ff8800"` or
/// `"white on blue"`. Unknown words are logged and skipped.
pub fn parse_style(raw: &str) -> ContentStyle {
    let mut style = ContentStyle::new();
    let mut words = tokenize(raw).into_iter();

    while let Some(word) = words.next() {
        let word = word.to_lowercase();
        match word.as_str() {
            "on" => match words.next().and_then(|w| parse_color(&w.to_lowercase())) {
                Some(bg) => style.background_color = Some(bg),
                None => tracing::warn!(style = raw, "Missing background color after 'on'"),
            },
            "not" => {
                if let Some(attr) = words.next().and_then(|w| parse_attribute(&w.to_lowercase()))
                {
                    style.attributes.unset(attr);
                }
            }
            "none" | "" => {}
            other => {
                if let Some(attr) = parse_attribute(other) {
                    style.attributes.set(attr);
                } else if let Some(fg) = parse_color(other) {
                    style.foreground_color = Some(fg);
                } else {
                    tracing::warn!(style = raw, word = other, "Ignoring unknown style word");
                }
            }
        }
    }
    style
}

/// Splits on whitespace, keeping `rgb(1, 2, 3)` together.
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for ch in raw.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() => {}
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_attribute(word: &str) -> Option<Attribute> {
    match word {
        "bold" | "b" => Some(Attribute::Bold),
        "dim" | "d" => Some(Attribute::Dim),
        "italic" | "i" => Some(Attribute::Italic),
        "underline" | "u" => Some(Attribute::Underlined),
        "blink" => Some(Attribute::SlowBlink),
        "reverse" | "r" => Some(Attribute::Reverse),
        "strike" | "s" => Some(Attribute::CrossedOut),
        "conceal" => Some(Attribute::Hidden),
        _ => None,
    }
}

/// Color names follow the ANSI palette: `magenta` is color 5,
/// `bright_magenta` is color 13.
fn parse_color(word: &str) -> Option<Color> {
    let color = match word {
        "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::DarkRed,
        "green" => Color::DarkGreen,
        "yellow" => Color::DarkYellow,
        "blue" => Color::DarkBlue,
        "magenta" => Color::DarkMagenta,
        "cyan" => Color::DarkCyan,
        "white" => Color::Grey,
        "bright_black" | "grey" | "gray" => Color::DarkGrey,
        "bright_red" => Color::Red,
        "bright_green" => Color::Green,
        "bright_yellow" => Color::Yellow,
        "bright_blue" => Color::Blue,
        "bright_magenta" => Color::Magenta,
        "bright_cyan" => Color::Cyan,
        "bright_white" => Color::White,
        _ => {
            if word.starts_with('#') {
                return parse_hex_color(word);
            }
            if let Some(n) = call_args(word, "color") {
                return n.parse::<u8>().ok().map(Color::AnsiValue);
            }
            if let Some(args) = call_args(word, "rgb") {
                let parts: Vec<u8> = args
                    .split(',')
                    .map(|p| p.trim().parse::<u8>())
                    .collect::<Result<_, _>>()
                    .ok()?;
                return match parts[..] {
                    [r, g, b] => Some(Color::Rgb { r, g, b }),
                    _ => None,
                };
            }
            return None;
        }
    };
    Some(color)
}

fn call_args<'a>(word: &'a str, name: &str) -> Option<&'a str> {
    word.strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::Rgb { r, g, b })
}
