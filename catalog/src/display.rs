//! Display formatting shared by list and detail views

pub const ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// Official artwork URL for a national dex number
pub fn artwork_url(id: u32) -> String {
    format!("{}/{}.png", ARTWORK_BASE_URL, id)
}

/// `"mr-mime"` -> `"Mr Mime"`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"pIKACHU"` -> `"Pikachu"`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `25` -> `"#025"`; numbers wider than three digits are not truncated
pub fn format_number(number: u32) -> String {
    format!("#{:03}", number)
}
