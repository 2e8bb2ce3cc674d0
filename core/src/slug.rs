//! Title to URL slug conversion.

/// Derive a lowercase, hyphenated, ASCII-only slug from a recipe title.
///
/// Whitespace, `-` and `_` separate words. `@` becomes the word "at". Common
/// accented Latin letters are folded to ASCII; any other punctuation or
/// non-Latin character is dropped without introducing a separator, so
/// "Mom's Pie" becomes "moms-pie".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut gap = false;

    for c in title.chars() {
        match c {
            '-' | '_' => gap = true,
            c if c.is_whitespace() => gap = true,
            '@' => {
                gap = true;
                push(&mut slug, &mut gap, "at");
                gap = true;
            }
            c if c.is_ascii_alphanumeric() => {
                let mut buf = [0u8; 4];
                push(
                    &mut slug,
                    &mut gap,
                    c.to_ascii_lowercase().encode_utf8(&mut buf),
                );
            }
            c => {
                if let Some(folded) = fold_latin(c) {
                    push(&mut slug, &mut gap, folded);
                }
            }
        }
    }

    slug
}

fn push(slug: &mut String, gap: &mut bool, s: &str) {
    if *gap && !slug.is_empty() {
        slug.push('-');
    }
    *gap = false;
    slug.push_str(s);
}

fn fold_latin(c: char) -> Option<&'static str> {
    let lower = c.to_lowercase().next()?;
    let folded = match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'č' | 'ć' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ñ' | 'ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'œ' => "oe",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => "u",
        'ý' | 'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        'ł' => "l",
        _ => return None,
    };
    Some(folded)
}
