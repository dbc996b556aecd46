/// `11144477735` → `111.444.777-35`. Anything that is not eleven digits
/// comes back empty, mirroring how the listing renders unknown documents.
pub fn format_cpf(cpf: &str) -> String {
    if cpf.len() != 11 || !cpf.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }
    format!("{}.{}.{}-{}", &cpf[..3], &cpf[3..6], &cpf[6..9], &cpf[9..])
}

/// Bare digit strings → `(dd) ddddd-dddd` (11 digits) or `(dd) dddd-dddd`
/// (10 digits).
pub fn format_phone(phone: &str) -> String {
    if phone.len() < 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }
    let ddd = &phone[..2];
    let prefix = if phone.len() == 11 {
        &phone[2..7]
    } else {
        &phone[2..6]
    };
    let suffix = &phone[phone.len() - 4..];
    format!("({ddd}) {prefix}-{suffix}")
}

/// Capitalizes each space-separated word, lowercasing the rest.
pub fn title_case(value: &str) -> String {
    capitalize_words(value, ' ', " ")
}

/// `pos_graduacao` → `Pos Graduacao`; used for enum-ish backend strings.
pub fn label_from_snake(value: &str) -> String {
    capitalize_words(value, '_', " ")
}

fn capitalize_words(value: &str, separator: char, joiner: &str) -> String {
    value
        .split(separator)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(joiner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_mask() {
        assert_eq!(format_cpf("11144477735"), "111.444.777-35");
        assert_eq!(format_cpf("111444777"), "");
        assert_eq!(format_cpf("11144477a35"), "");
    }

    #[test]
    fn phone_mask_handles_both_lengths() {
        assert_eq!(format_phone("11912345678"), "(11) 91234-5678");
        assert_eq!(format_phone("1112345678"), "(11) 1234-5678");
        assert_eq!(format_phone("123"), "");
    }

    #[test]
    fn labels() {
        assert_eq!(title_case("maria DAS dores"), "Maria Das Dores");
        assert_eq!(label_from_snake("pos_graduacao"), "Pos Graduacao");
        assert_eq!(label_from_snake(""), "");
    }
}
