//! Display-name normalization for media channels and division tags.

/// Map a raw media name from the billing feed to its tracker channel name.
/// Unknown names pass through unchanged.
pub fn channel_name(media: &str) -> &str {
    match media.trim() {
        "TELEVISION" => "TV",
        "PRESS" => "Print",
        "CINEMA" => "Cinema",
        "POSTER" => "OOH",
        "SEARCH&SOC" => "Social",
        "DISPLAY" => "Display",
        "FEES" | "INT'L" => "Retainer Fee",
        other => other,
    }
}

/// Division label for an unbilled workbook sheet name.
pub fn division_for_sheet(sheet: &str) -> &str {
    match sheet.trim() {
        "F_B" | "F&B" => "F&B",
        "WFJ" | "W&FJ" => "W&FJ",
        "FASHION" | "FSH&EW" => "FSH&EW",
        "PAID SEARCH" | "Paid Search" => "Paid Search",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_media_names() {
        assert_eq!(channel_name("TELEVISION"), "TV");
        assert_eq!(channel_name("POSTER"), "OOH");
        assert_eq!(channel_name("FEES"), "Retainer Fee");
        assert_eq!(channel_name("INT'L"), "Retainer Fee");
    }

    #[test]
    fn unknown_media_passes_through() {
        assert_eq!(channel_name("Podcast"), "Podcast");
        assert_eq!(channel_name(" TELEVISION "), "TV");
    }

    #[test]
    fn sheet_divisions() {
        assert_eq!(division_for_sheet("F_B"), "F&B");
        assert_eq!(division_for_sheet("WFJ"), "W&FJ");
        assert_eq!(division_for_sheet("FASHION"), "FSH&EW");
        assert_eq!(division_for_sheet("PAID SEARCH"), "Paid Search");
        assert_eq!(division_for_sheet("Notes"), "Notes");
    }
}
