//! Scripture reference parsing.
//!
//! Grammar: `<book-name> <chapter>[:<verse>[-<verse-end>]]`, matched
//! case-insensitively against a fixed table of the 66 canonical books.

use std::fmt;

use regex::Regex;

/// One canonical book.
#[derive(Debug, PartialEq, Eq)]
pub struct Book {
    /// Canonical 2-4 letter code used in provider passage identifiers.
    pub code: &'static str,
    /// Display name; also the target of the numeric book-id mapping used by
    /// providers that return numeric identifiers.
    pub name: &'static str,
    aliases: &'static [&'static str],
}

const fn book(code: &'static str, name: &'static str, aliases: &'static [&'static str]) -> Book {
    Book {
        code,
        name,
        aliases,
    }
}

/// The 66 canonical books in order. Index + 1 is the numeric book id.
///
/// Aliases are lowercase lookup keys: full name, standard abbreviations, and
/// unspaced forms for numeric-prefixed books ("1samuel", "1sa").
pub static BOOKS: [Book; 66] = [
    book("GEN", "Genesis", &["genesis", "gen"]),
    book("EXO", "Exodus", &["exodus", "exo"]),
    book("LEV", "Leviticus", &["leviticus", "lev"]),
    book("NUM", "Numbers", &["numbers", "num"]),
    book("DEU", "Deuteronomy", &["deuteronomy", "deu", "deut"]),
    book("JOS", "Joshua", &["joshua", "jos"]),
    book("JDG", "Judges", &["judges", "jdg"]),
    book("RUT", "Ruth", &["ruth", "rut"]),
    book("1SA", "1 Samuel", &["1 samuel", "1samuel", "1sa"]),
    book("2SA", "2 Samuel", &["2 samuel", "2samuel", "2sa"]),
    book("1KI", "1 Kings", &["1 kings", "1kings", "1ki"]),
    book("2KI", "2 Kings", &["2 kings", "2kings", "2ki"]),
    book("1CH", "1 Chronicles", &["1 chronicles", "1chronicles", "1ch"]),
    book("2CH", "2 Chronicles", &["2 chronicles", "2chronicles", "2ch"]),
    book("EZR", "Ezra", &["ezra", "ezr"]),
    book("NEH", "Nehemiah", &["nehemiah", "neh"]),
    book("EST", "Esther", &["esther", "est"]),
    book("JOB", "Job", &["job"]),
    book("PSA", "Psalms", &["psalms", "psalm", "psa", "ps"]),
    book("PRO", "Proverbs", &["proverbs", "prov", "pro"]),
    book("ECC", "Ecclesiastes", &["ecclesiastes", "ecc"]),
    book("SNG", "Song of Solomon", &["song of solomon", "song", "sng"]),
    book("ISA", "Isaiah", &["isaiah", "isa"]),
    book("JER", "Jeremiah", &["jeremiah", "jer"]),
    book("LAM", "Lamentations", &["lamentations", "lam"]),
    book("EZK", "Ezekiel", &["ezekiel", "ezk", "eze"]),
    book("DAN", "Daniel", &["daniel", "dan"]),
    book("HOS", "Hosea", &["hosea", "hos"]),
    book("JOL", "Joel", &["joel", "jol"]),
    book("AMO", "Amos", &["amos", "amo"]),
    book("OBA", "Obadiah", &["obadiah", "oba"]),
    book("JON", "Jonah", &["jonah", "jon"]),
    book("MIC", "Micah", &["micah", "mic"]),
    book("NAM", "Nahum", &["nahum", "nam"]),
    book("HAB", "Habakkuk", &["habakkuk", "hab"]),
    book("ZEP", "Zephaniah", &["zephaniah", "zep"]),
    book("HAG", "Haggai", &["haggai", "hag"]),
    book("ZEC", "Zechariah", &["zechariah", "zec"]),
    book("MAL", "Malachi", &["malachi", "mal"]),
    book("MAT", "Matthew", &["matthew", "matt", "mat"]),
    book("MRK", "Mark", &["mark", "mrk"]),
    book("LUK", "Luke", &["luke", "luk"]),
    book("JHN", "John", &["john", "jhn"]),
    book("ACT", "Acts", &["acts", "act"]),
    book("ROM", "Romans", &["romans", "rom"]),
    book("1CO", "1 Corinthians", &["1 corinthians", "1corinthians", "1co"]),
    book("2CO", "2 Corinthians", &["2 corinthians", "2corinthians", "2co"]),
    book("GAL", "Galatians", &["galatians", "gal"]),
    book("EPH", "Ephesians", &["ephesians", "eph"]),
    book("PHP", "Philippians", &["philippians", "php", "phil"]),
    book("COL", "Colossians", &["colossians", "col"]),
    book("1TH", "1 Thessalonians", &["1 thessalonians", "1thessalonians", "1th"]),
    book("2TH", "2 Thessalonians", &["2 thessalonians", "2thessalonians", "2th"]),
    book("1TI", "1 Timothy", &["1 timothy", "1timothy", "1ti"]),
    book("2TI", "2 Timothy", &["2 timothy", "2timothy", "2ti"]),
    book("TIT", "Titus", &["titus", "tit"]),
    book("PHM", "Philemon", &["philemon", "phm"]),
    book("HEB", "Hebrews", &["hebrews", "heb"]),
    book("JAS", "James", &["james", "jas"]),
    book("1PE", "1 Peter", &["1 peter", "1peter", "1pe"]),
    book("2PE", "2 Peter", &["2 peter", "2peter", "2pe"]),
    book("1JN", "1 John", &["1 john", "1john", "1jn"]),
    book("2JN", "2 John", &["2 john", "2john", "2jn"]),
    book("3JN", "3 John", &["3 john", "3john", "3jn"]),
    book("JUD", "Jude", &["jude", "jud"]),
    book("REV", "Revelation", &["revelation", "rev"]),
];

/// Look up a book by lowercase name or abbreviation.
pub fn find_book(token: &str) -> Option<&'static Book> {
    BOOKS.iter().find(|b| b.aliases.contains(&token))
}

/// Map a numeric book id (1..=66) to its display name.
///
/// Out-of-range ids yield the `"Unknown Book"` sentinel; it is displayed
/// as-is, never treated as an error.
pub fn book_display_name(id: u32) -> &'static str {
    match id {
        1..=66 => BOOKS[(id - 1) as usize].name,
        _ => "Unknown Book",
    }
}

/// User-facing parse rejection. Never fatal; the message text is shown to the
/// requester directly.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid reference format. Try: John 3:16 or Psalm 23")]
    InvalidFormat,

    #[error("Unknown book: {0}")]
    UnknownBook(String),
}

/// A parsed reference. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptureReference {
    pub book: &'static Book,
    pub chapter: u32,
    pub verse_start: Option<u32>,
    pub verse_end: Option<u32>,
}

impl ScriptureReference {
    /// Provider passage identifier: `BOOK.c`, `BOOK.c.v`, or
    /// `BOOK.c.v-BOOK.c.w`.
    pub fn passage_id(&self) -> String {
        let code = self.book.code;
        let c = self.chapter;
        match (self.verse_start, self.verse_end) {
            (Some(v), Some(w)) => format!("{code}.{c}.{v}-{code}.{c}.{w}"),
            (Some(v), None) => format!("{code}.{c}.{v}"),
            _ => format!("{code}.{c}"),
        }
    }
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.book.name;
        let c = self.chapter;
        match (self.verse_start, self.verse_end) {
            (Some(v), Some(w)) => write!(f, "{name} {c}:{v}-{w}"),
            (Some(v), None) => write!(f, "{name} {c}:{v}"),
            _ => write!(f, "{name} {c}"),
        }
    }
}

/// Parse a free-text reference like "John 3:16" or "Psalm 23".
///
/// The book-name group is lazy, so the trailing numeric token is always taken
/// as the chapter. An inverted verse range (end < start) is passed through
/// unchanged; providers report it as not found.
pub fn parse(text: &str) -> Result<ScriptureReference, ParseError> {
    let normalized = text.trim().to_lowercase();

    let grammar = Regex::new(r"^(.+?)\s+(\d+)(?::(\d+)(?:-(\d+))?)?$").expect("valid regex");
    let caps = grammar
        .captures(&normalized)
        .ok_or(ParseError::InvalidFormat)?;

    let book_token = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
    let book =
        find_book(book_token).ok_or_else(|| ParseError::UnknownBook(book_token.to_string()))?;

    let chapter: u32 = caps[2].parse().map_err(|_| ParseError::InvalidFormat)?;
    if chapter == 0 {
        return Err(ParseError::InvalidFormat);
    }

    let verse_start = parse_verse(caps.get(3).map(|m| m.as_str()))?;
    let verse_end = parse_verse(caps.get(4).map(|m| m.as_str()))?;

    Ok(ScriptureReference {
        book,
        chapter,
        verse_start,
        verse_end,
    })
}

fn parse_verse(raw: Option<&str>) -> Result<Option<u32>, ParseError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| ParseError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passage_id_round_trips_verse() {
        let r = parse("John 3:16").unwrap();
        assert_eq!(r.passage_id(), "JHN.3.16");
        assert_eq!(r.to_string(), "John 3:16");
    }

    #[test]
    fn passage_id_round_trips_chapter_only() {
        let r = parse("Psalm 23").unwrap();
        assert_eq!(r.passage_id(), "PSA.23");
        assert_eq!(r.to_string(), "Psalms 23");
        assert_eq!(r.verse_start, None);
    }

    #[test]
    fn passage_id_round_trips_range() {
        let r = parse("Romans 8:28-30").unwrap();
        assert_eq!(r.passage_id(), "ROM.8.28-ROM.8.30");
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        let r = parse("  JOHN 3:16  ").unwrap();
        assert_eq!(r.book.code, "JHN");
    }

    #[test]
    fn numeric_prefixed_books_match_spaced_and_unspaced() {
        for input in ["1 Samuel 17:4", "1samuel 17:4", "1sa 17:4"] {
            let r = parse(input).unwrap();
            assert_eq!(r.passage_id(), "1SA.17.4", "input: {input}");
        }
    }

    #[test]
    fn missing_chapter_is_invalid_format() {
        assert_eq!(parse("john"), Err(ParseError::InvalidFormat));
        assert_eq!(parse(""), Err(ParseError::InvalidFormat));
        assert_eq!(parse("john three"), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn chapter_zero_is_invalid_format() {
        assert_eq!(parse("john 0"), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn unknown_book_is_reported_with_token() {
        assert_eq!(
            parse("florbus 3:16"),
            Err(ParseError::UnknownBook("florbus".to_string()))
        );
    }

    #[test]
    fn inverted_range_is_accepted_as_is() {
        let r = parse("Romans 8:30-28").unwrap();
        assert_eq!(r.passage_id(), "ROM.8.30-ROM.8.28");
    }

    #[test]
    fn book_id_mapping_has_unknown_sentinel() {
        assert_eq!(book_display_name(1), "Genesis");
        assert_eq!(book_display_name(43), "John");
        assert_eq!(book_display_name(66), "Revelation");
        assert_eq!(book_display_name(0), "Unknown Book");
        assert_eq!(book_display_name(67), "Unknown Book");
    }

    #[test]
    fn every_book_alias_resolves_to_its_own_entry() {
        for b in BOOKS.iter() {
            for alias in b.aliases {
                let found = find_book(alias).expect("alias resolves");
                assert_eq!(found.code, b.code, "alias {alias}");
            }
        }
    }
}
