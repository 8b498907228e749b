//! # Números e Ordinais — Tabelas de Padrões e Léxicos por Cultura
//!
//! Cada cultura contribui com uma tabela imutável de expressões regulares
//! (dígitos, decimais, frações, faixas, números por extenso) e com os léxicos
//! de composição ("trinta e cinco" → 35, "twenty-first" → 21). As tabelas são
//! construídas uma única vez no início do processo ([`LazyLock`]) e
//! compartilhadas por referência somente-leitura entre todas as chamadas —
//! nenhuma sincronização é necessária no caminho de leitura.
//!
//! ## Ordinais relativos
//!
//! Além dos ordinais absolutos ("terceiro", "3rd"), o léxico mapeia frases
//! relativas a um ponto de referência:
//!
//! | Frase               | offset | relativeTo |
//! |---------------------|--------|------------|
//! | "last" / "último"   | 0      | end        |
//! | "second to last"    | -1     | end        |
//! | "antepenúltimo"     | -2     | end        |
//! | "next" / "próximo"  | 1      | current    |
//!
//! O extrator anexa esses metadados ao candidato; o construtor de resolução
//! sintetiza o valor final ("end-1", "current+1") a partir deles.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::normalizer::fold_chars;
use crate::types::{
    model_type, number_kind, select_non_overlapping, Culture, ExtractResult, Extractor,
    OrdinalMetadata, ParseData, ParseResult, Parser,
};

/// Um padrão da tabela: regex + tipo bruto atribuído ao casamento.
struct Pattern {
    regex: Regex,
    kind: &'static str,
}

/// Tabela imutável de uma cultura: padrões + léxicos de composição.
pub struct CultureTables {
    number_patterns: Vec<Pattern>,
    ordinal_patterns: Vec<Pattern>,
    /// (frase em minúsculas, offset, relativeTo) — frases mais longas primeiro.
    relative_map: Vec<(&'static str, &'static str, &'static str)>,
    units: HashMap<&'static str, i64>,
    tens: HashMap<&'static str, i64>,
    scales: HashMap<&'static str, i64>,
    ordinal_words: HashMap<&'static str, i64>,
    /// Conectivo ignorado na composição ("and" / "e").
    connector: &'static str,
    decimal_separator: char,
    group_separator: char,
}

static ENGLISH_TABLES: LazyLock<CultureTables> = LazyLock::new(build_english);
static PORTUGUESE_TABLES: LazyLock<CultureTables> = LazyLock::new(build_portuguese);

pub(crate) fn tables(culture: Culture) -> &'static CultureTables {
    match culture {
        Culture::English => &ENGLISH_TABLES,
        Culture::Portuguese => &PORTUGUESE_TABLES,
    }
}

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("padrão de regex embutido inválido")
}

/// Alternação regex com as palavras mais longas primeiro (a regex prefere a
/// alternativa mais à esquerda, então "sixteen" precisa vir antes de "six").
fn alternation<'a>(words: impl Iterator<Item = &'a str>) -> String {
    let mut sorted: Vec<&str> = words.collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    sorted.join("|")
}

const ENGLISH_UNITS: &[(&str, i64)] = &[
    ("zero", 0), ("one", 1), ("two", 2), ("three", 3), ("four", 4),
    ("five", 5), ("six", 6), ("seven", 7), ("eight", 8), ("nine", 9),
    ("ten", 10), ("eleven", 11), ("twelve", 12), ("thirteen", 13),
    ("fourteen", 14), ("fifteen", 15), ("sixteen", 16), ("seventeen", 17),
    ("eighteen", 18), ("nineteen", 19),
];

const ENGLISH_TENS: &[(&str, i64)] = &[
    ("twenty", 20), ("thirty", 30), ("forty", 40), ("fifty", 50),
    ("sixty", 60), ("seventy", 70), ("eighty", 80), ("ninety", 90),
];

const ENGLISH_SCALES: &[(&str, i64)] = &[
    ("hundred", 100), ("thousand", 1_000), ("million", 1_000_000),
    ("billion", 1_000_000_000),
];

const ENGLISH_ORDINAL_WORDS: &[(&str, i64)] = &[
    ("first", 1), ("second", 2), ("third", 3), ("fourth", 4), ("fifth", 5),
    ("sixth", 6), ("seventh", 7), ("eighth", 8), ("ninth", 9), ("tenth", 10),
    ("eleventh", 11), ("twelfth", 12), ("thirteenth", 13), ("fourteenth", 14),
    ("fifteenth", 15), ("sixteenth", 16), ("seventeenth", 17),
    ("eighteenth", 18), ("nineteenth", 19), ("twentieth", 20),
    ("thirtieth", 30), ("fortieth", 40), ("fiftieth", 50), ("sixtieth", 60),
    ("seventieth", 70), ("eightieth", 80), ("ninetieth", 90),
    ("hundredth", 100), ("thousandth", 1_000),
];

const ENGLISH_RELATIVE: &[(&str, &str, &str)] = &[
    ("the one before the last", "-1", "end"),
    ("the last but one", "-1", "end"),
    ("second to last", "-1", "end"),
    ("third to last", "-2", "end"),
    ("next to last", "-1", "end"),
    ("antepenultimate", "-2", "end"),
    ("penultimate", "-1", "end"),
    ("the last", "0", "end"),
    ("last", "0", "end"),
    ("the previous one", "-1", "current"),
    ("previous", "-1", "current"),
    ("the current one", "0", "current"),
    ("current", "0", "current"),
    ("the next one", "1", "current"),
    ("next", "1", "current"),
];

const PORTUGUESE_UNITS: &[(&str, i64)] = &[
    ("zero", 0), ("um", 1), ("uma", 1), ("dois", 2), ("duas", 2),
    ("três", 3), ("tres", 3), ("quatro", 4), ("cinco", 5), ("seis", 6),
    ("sete", 7), ("oito", 8), ("nove", 9), ("dez", 10), ("onze", 11),
    ("doze", 12), ("treze", 13), ("catorze", 14), ("quatorze", 14),
    ("quinze", 15), ("dezesseis", 16), ("dezessete", 17), ("dezoito", 18),
    ("dezenove", 19), ("cem", 100), ("cento", 100),
    ("duzentos", 200), ("duzentas", 200), ("trezentos", 300),
    ("trezentas", 300), ("quatrocentos", 400), ("quatrocentas", 400),
    ("quinhentos", 500), ("quinhentas", 500), ("seiscentos", 600),
    ("seiscentas", 600), ("setecentos", 700), ("setecentas", 700),
    ("oitocentos", 800), ("oitocentas", 800), ("novecentos", 900),
    ("novecentas", 900),
];

const PORTUGUESE_TENS: &[(&str, i64)] = &[
    ("vinte", 20), ("trinta", 30), ("quarenta", 40), ("cinquenta", 50),
    ("sessenta", 60), ("setenta", 70), ("oitenta", 80), ("noventa", 90),
];

const PORTUGUESE_SCALES: &[(&str, i64)] = &[
    ("mil", 1_000), ("milhão", 1_000_000), ("milhao", 1_000_000),
    ("milhões", 1_000_000), ("milhoes", 1_000_000),
    ("bilhão", 1_000_000_000), ("bilhao", 1_000_000_000),
    ("bilhões", 1_000_000_000), ("bilhoes", 1_000_000_000),
];

const PORTUGUESE_ORDINAL_WORDS: &[(&str, i64)] = &[
    ("primeiro", 1), ("primeira", 1), ("segundo", 2), ("segunda", 2),
    ("terceiro", 3), ("terceira", 3), ("quarto", 4), ("quarta", 4),
    ("quinto", 5), ("quinta", 5), ("sexto", 6), ("sexta", 6),
    ("sétimo", 7), ("sétima", 7), ("oitavo", 8), ("oitava", 8),
    ("nono", 9), ("nona", 9), ("décimo", 10), ("décima", 10),
    ("vigésimo", 20), ("vigésima", 20), ("trigésimo", 30), ("trigésima", 30),
    ("quadragésimo", 40), ("quinquagésimo", 50), ("sexagésimo", 60),
    ("septuagésimo", 70), ("octogésimo", 80), ("nonagésimo", 90),
    ("centésimo", 100), ("centésima", 100), ("milésimo", 1_000),
    ("milésima", 1_000),
];

const PORTUGUESE_RELATIVE: &[(&str, &str, &str)] = &[
    ("antepenúltimo", "-2", "end"),
    ("antepenúltima", "-2", "end"),
    ("penúltimo", "-1", "end"),
    ("penúltima", "-1", "end"),
    ("último", "0", "end"),
    ("última", "0", "end"),
    ("anterior", "-1", "current"),
    ("próximo", "1", "current"),
    ("próxima", "1", "current"),
    ("atual", "0", "current"),
];

fn build_english() -> CultureTables {
    build_tables(
        ENGLISH_UNITS,
        ENGLISH_TENS,
        ENGLISH_SCALES,
        ENGLISH_ORDINAL_WORDS,
        ENGLISH_RELATIVE,
        "and",
        '.',
        ',',
        &["st", "nd", "rd", "th"],
    )
}

fn build_portuguese() -> CultureTables {
    build_tables(
        PORTUGUESE_UNITS,
        PORTUGUESE_TENS,
        PORTUGUESE_SCALES,
        PORTUGUESE_ORDINAL_WORDS,
        PORTUGUESE_RELATIVE,
        "e",
        ',',
        '.',
        &["º", "ª", "°"],
    )
}

#[allow(clippy::too_many_arguments)]
fn build_tables(
    units: &'static [(&'static str, i64)],
    tens: &'static [(&'static str, i64)],
    scales: &'static [(&'static str, i64)],
    ordinal_words: &'static [(&'static str, i64)],
    relative: &'static [(&'static str, &'static str, &'static str)],
    connector: &'static str,
    decimal_separator: char,
    group_separator: char,
    ordinal_suffixes: &[&str],
) -> CultureTables {
    let group = regex::escape(&group_separator.to_string());
    let decimal = regex::escape(&decimal_separator.to_string());

    let cardinal_alt = alternation(
        units.iter().chain(tens).chain(scales).map(|(w, _)| *w),
    );
    let ordinal_alt = alternation(ordinal_words.iter().map(|(w, _)| *w));
    let relative_alt = alternation(relative.iter().map(|(p, _, _)| *p));
    let suffix_alt = ordinal_suffixes.join("|");

    let number_patterns = vec![
        Pattern {
            regex: rx(r"\b\d+\s*-\s*\d+\b"),
            kind: number_kind::RANGE,
        },
        Pattern {
            regex: rx(r"\b\d+\s*/\s*\d+\b"),
            kind: number_kind::FRACTION,
        },
        Pattern {
            regex: rx(&format!(
                r"\b\d{{1,3}}(?:{group}\d{{3}})+{decimal}\d+\b|\b\d+{decimal}\d+\b"
            )),
            kind: number_kind::DECIMAL,
        },
        Pattern {
            regex: rx(&format!(r"\b\d{{1,3}}(?:{group}\d{{3}})+\b")),
            kind: number_kind::INTEGER,
        },
        Pattern {
            regex: rx(r"\b\d+\b"),
            kind: number_kind::INTEGER,
        },
        Pattern {
            regex: rx(&format!(
                r"(?i)\b(?:{cardinal_alt})(?:(?:\s+{connector})?[\s-]+(?:{cardinal_alt}))*\b"
            )),
            kind: number_kind::INTEGER,
        },
    ];

    let ordinal_patterns = vec![
        Pattern {
            regex: rx(&format!(r"(?i)\b(?:{relative_alt})\b")),
            kind: model_type::ORDINAL_RELATIVE,
        },
        Pattern {
            regex: rx(&format!(r"(?i)\b\d+(?:{suffix_alt})")),
            kind: number_kind::ORDINAL,
        },
        Pattern {
            regex: rx(&format!(
                r"(?i)\b(?:(?:{cardinal_alt})[\s-]+)*(?:{ordinal_alt})(?:(?:\s+{connector})?[\s-]+(?:{ordinal_alt}))*\b"
            )),
            kind: number_kind::ORDINAL,
        },
    ];

    CultureTables {
        number_patterns,
        ordinal_patterns,
        relative_map: relative.to_vec(),
        units: units.iter().copied().collect(),
        tens: tens.iter().copied().collect(),
        scales: scales.iter().copied().collect(),
        ordinal_words: ordinal_words.iter().copied().collect(),
        connector,
        decimal_separator,
        group_separator,
    }
}

/// Extrator de números cardinais (dígitos, decimais, frações, faixas, extenso).
pub struct NumberExtractor {
    culture: Culture,
    tables: &'static CultureTables,
}

impl NumberExtractor {
    pub fn new(culture: Culture) -> Self {
        Self { culture, tables: tables(culture) }
    }
}

impl Extractor for NumberExtractor {
    fn culture(&self) -> Culture {
        self.culture
    }

    fn extract(&self, text: &str) -> Vec<ExtractResult> {
        run_patterns(&self.tables.number_patterns, text, None)
    }
}

/// Extrator de ordinais absolutos ("third", "21st", "décimo") e relativos
/// ("second to last", "penúltimo") — estes com metadados do léxico anexados.
pub struct OrdinalExtractor {
    culture: Culture,
    tables: &'static CultureTables,
}

impl OrdinalExtractor {
    pub fn new(culture: Culture) -> Self {
        Self { culture, tables: tables(culture) }
    }
}

impl Extractor for OrdinalExtractor {
    fn culture(&self) -> Culture {
        self.culture
    }

    fn extract(&self, text: &str) -> Vec<ExtractResult> {
        run_patterns(
            &self.tables.ordinal_patterns,
            text,
            Some(self.tables.relative_map.as_slice()),
        )
    }
}

fn run_patterns(
    patterns: &[Pattern],
    text: &str,
    relative_map: Option<&[(&'static str, &'static str, &'static str)]>,
) -> Vec<ExtractResult> {
    let mut candidates = Vec::new();

    for pattern in patterns {
        for m in pattern.regex.find_iter(text) {
            let metadata = if pattern.kind == model_type::ORDINAL_RELATIVE {
                let key = fold_chars(m.as_str()).to_lowercase();
                match relative_map.and_then(|map| map.iter().find(|(p, _, _)| *p == key)) {
                    Some((_, offset, relative_to)) => Some(OrdinalMetadata {
                        is_ordinal_relative: true,
                        offset: (*offset).to_string(),
                        relative_to: (*relative_to).to_string(),
                    }),
                    // Frase fora do léxico: candidato inútil, melhor descartar já
                    None => continue,
                }
            } else {
                None
            };

            candidates.push(ExtractResult {
                text: m.as_str().to_string(),
                start: m.start(),
                length: m.len(),
                kind: pattern.kind.to_string(),
                metadata,
            });
        }
    }

    select_non_overlapping(candidates)
}

/// Forma canônica invariante do valor ("2", "0.75", "1234567").
fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Parser de números cardinais.
pub struct NumberParser {
    tables: &'static CultureTables,
}

impl NumberParser {
    pub fn new(culture: Culture) -> Self {
        Self { tables: tables(culture) }
    }

    fn parse_digits(&self, text: &str) -> Option<f64> {
        let cleaned: String = text
            .chars()
            .filter(|c| *c != self.tables.group_separator)
            .map(|c| if c == self.tables.decimal_separator { '.' } else { c })
            .collect();
        cleaned.parse::<f64>().ok()
    }

    fn parse_fraction(&self, text: &str) -> Option<f64> {
        let (numerator, denominator) = text.split_once('/')?;
        let numerator: f64 = numerator.trim().parse().ok()?;
        let denominator: f64 = denominator.trim().parse().ok()?;
        if denominator == 0.0 {
            return None;
        }
        Some(numerator / denominator)
    }

    /// Explode uma faixa "2-4" nos dois inteiros das pontas, com sub-spans
    /// apontando para as posições exatas de cada dígito no texto original.
    fn parse_range(&self, span: &ExtractResult) -> Option<ParseData> {
        let left: String = span
            .text
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        let right: String = {
            let reversed: String = span
                .text
                .chars()
                .rev()
                .take_while(char::is_ascii_digit)
                .collect();
            reversed.chars().rev().collect()
        };
        if left.is_empty() || right.is_empty() {
            return None;
        }

        let right_start = span.start + span.text.len() - right.len();
        let endpoints = [(left, span.start), (right, right_start)];

        let mut parts = Vec::with_capacity(2);
        for (digits, start) in endpoints {
            let value: f64 = digits.parse().ok()?;
            parts.push(ParseResult {
                text: digits.clone(),
                start,
                length: digits.len(),
                kind: number_kind::INTEGER.to_string(),
                value: Some(serde_json::Value::from(value)),
                resolution_text: format_value(value),
                metadata: None,
            });
        }
        Some(ParseData::Composite(parts))
    }
}

impl Parser for NumberParser {
    fn parse(&self, span: &ExtractResult) -> Option<ParseData> {
        if span.kind == number_kind::RANGE {
            return self.parse_range(span);
        }

        let (value, kind) = match span.kind.as_str() {
            number_kind::FRACTION => (self.parse_fraction(&span.text)?, number_kind::FRACTION),
            number_kind::DECIMAL => (self.parse_digits(&span.text)?, number_kind::DECIMAL),
            number_kind::INTEGER => {
                let value = if span.text.starts_with(|c: char| c.is_ascii_digit()) {
                    self.parse_digits(&span.text)?
                } else {
                    compose_cardinal(&span.text, self.tables)?
                };
                (value, number_kind::INTEGER)
            }
            _ => return None,
        };

        Some(ParseData::Single(ParseResult {
            text: span.text.clone(),
            start: span.start,
            length: span.length,
            kind: kind.to_string(),
            value: Some(serde_json::Value::from(value)),
            resolution_text: format_value(value),
            metadata: None,
        }))
    }
}

/// Parser de ordinais: absolutos ganham metadados `offset = valor` e
/// `relativeTo = "start"`; relativos repassam os metadados do extrator e não
/// carregam valor (o construtor de resolução o sintetiza).
pub struct OrdinalParser {
    tables: &'static CultureTables,
}

impl OrdinalParser {
    pub fn new(culture: Culture) -> Self {
        Self { tables: tables(culture) }
    }
}

impl Parser for OrdinalParser {
    fn parse(&self, span: &ExtractResult) -> Option<ParseData> {
        let result = match span.kind.as_str() {
            number_kind::ORDINAL => {
                let value = if span.text.starts_with(|c: char| c.is_ascii_digit()) {
                    let digits: String = span
                        .text
                        .chars()
                        .take_while(char::is_ascii_digit)
                        .collect();
                    digits.parse::<i64>().ok()?
                } else {
                    compose_ordinal(&span.text, self.tables)?
                };
                ParseResult {
                    text: span.text.clone(),
                    start: span.start,
                    length: span.length,
                    kind: number_kind::ORDINAL.to_string(),
                    value: Some(serde_json::Value::from(value)),
                    resolution_text: value.to_string(),
                    metadata: Some(OrdinalMetadata {
                        is_ordinal_relative: false,
                        offset: value.to_string(),
                        relative_to: "start".to_string(),
                    }),
                }
            }
            model_type::ORDINAL_RELATIVE => ParseResult {
                text: span.text.clone(),
                start: span.start,
                length: span.length,
                kind: number_kind::ORDINAL.to_string(),
                value: None,
                resolution_text: String::new(),
                metadata: Some(span.metadata.clone()?),
            },
            _ => return None,
        };

        Some(ParseData::Single(result))
    }
}

/// Compõe um número por extenso: soma parcial + multiplicação por escalas.
///
/// "two hundred thirty five thousand" → (2×100 + 35) × 1000 = 235000.
fn compose_cardinal(text: &str, tables: &CultureTables) -> Option<f64> {
    let folded = fold_chars(text).to_lowercase();
    let mut total = 0.0_f64;
    let mut current = 0.0_f64;
    let mut matched_any = false;

    for token in folded
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token == tables.connector {
            continue;
        }
        if let Some(&value) = tables.units.get(token).or_else(|| tables.tens.get(token)) {
            current += value as f64;
        } else if let Some(&scale) = tables.scales.get(token) {
            if current == 0.0 {
                current = 1.0;
            }
            current *= scale as f64;
            if scale >= 1_000 {
                total += current;
                current = 0.0;
            }
        } else {
            return None;
        }
        matched_any = true;
    }

    matched_any.then_some(total + current)
}

/// Compõe um ordinal por extenso de forma aditiva.
///
/// "twenty-first" → 20 + 1 = 21; "décimo terceiro" → 10 + 3 = 13.
fn compose_ordinal(text: &str, tables: &CultureTables) -> Option<i64> {
    let folded = fold_chars(text).to_lowercase();
    let mut sum = 0_i64;
    let mut matched_any = false;

    for token in folded
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token == tables.connector {
            continue;
        }
        let value = tables
            .ordinal_words
            .get(token)
            .or_else(|| tables.units.get(token))
            .or_else(|| tables.tens.get(token))?;
        sum += value;
        matched_any = true;
    }

    matched_any.then_some(sum)
}
