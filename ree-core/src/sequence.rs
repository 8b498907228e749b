//! # Entidades de Sequência — Telefones, E-mails, URLs, IPs, GUIDs
//!
//! Diferente dos números, estas entidades são definidas puramente por formato:
//! uma tabela de regexes por família, sem léxico nem cultura. O parser apenas
//! valida e canoniza o trecho (ex: octetos de IPv4 fora de faixa derrubam o
//! candidato — falha de item, não de consulta).
//!
//! ## Filtro de máscara (telefones)
//!
//! Um padrão de número mascarado ("XXX-XXX-1234") pode coincidir com spans
//! curtos válidos (o "1234" solto). Somente spans **inteiramente contidos**
//! em um casamento da máscara são descartados; um span que apenas encosta na
//! borda de uma máscara é mantido — consumidores dependem dessa assimetria.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{
    model_type, select_non_overlapping, Culture, ExtractResult, Extractor, ParseData,
    ParseResult, Parser,
};

static PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Internacional: +55 11 98765-4321, +1 (425) 555-0100
        rx(r"\+\d{1,3}[ .-]?\(?\d{2,3}\)?[ .-]?\d{3,5}[ .-]?\d{4}\b"),
        // Brasileiro com DDD: (11) 98765-4321
        rx(r"\(\d{2,3}\)[ .-]?\d{4,5}[ .-]\d{4}\b"),
        // Norte-americano: 555-123-4567
        rx(r"\b\d{3}[ .-]\d{3}[ .-]\d{4}\b"),
        // Local: 98765-4321
        rx(r"\b\d{4,5}[ .-]\d{4}\b"),
        // Bloco curto (ramal/final de linha) — alto recall, filtrado pela máscara
        rx(r"\b\d{4}\b"),
    ]
});

/// Máscara de formatação: sequências de caracteres mascaradores com um bloco
/// de dígitos embutido ("XXX-XXX-1234", "***-1234").
static PHONE_MASK: LazyLock<Regex> =
    LazyLock::new(|| rx(r"[Xx*]{2,}(?:[ .-][Xx*\d]{2,5})+"));

static EMAIL_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![rx(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")]);

static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        rx(r#"https?://[^\s<>"',;!]+"#),
        rx(r"\bwww\.[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+(?:/[^\s]*)?"),
    ]
});

static IP_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![rx(r"\b(?:\d{1,3}\.){3}\d{1,3}\b")]);

static GUID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![rx(
        r"\b[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\b",
    )]
});

static MENTION_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![rx(r"@[A-Za-z_][A-Za-z0-9_]*")]);

static HASHTAG_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![rx(r"#[A-Za-z_][A-Za-z0-9_]*")]);

fn rx(pattern: &str) -> Regex {
    Regex::new(pattern).expect("padrão de regex embutido inválido")
}

/// Extrator genérico de sequência: tabela de regexes + máscara de exclusão
/// opcional. Uma instância por família de entidade, selecionada na construção.
pub struct SequenceExtractor {
    kind: &'static str,
    patterns: &'static [Regex],
    mask: Option<&'static Regex>,
}

impl SequenceExtractor {
    pub fn phone_number() -> Self {
        Self {
            kind: model_type::PHONE_NUMBER,
            patterns: LazyLock::force(&PHONE_PATTERNS).as_slice(),
            mask: Some(LazyLock::force(&PHONE_MASK)),
        }
    }

    pub fn email() -> Self {
        Self {
            kind: model_type::EMAIL,
            patterns: LazyLock::force(&EMAIL_PATTERNS).as_slice(),
            mask: None,
        }
    }

    pub fn url() -> Self {
        Self {
            kind: model_type::URL,
            patterns: LazyLock::force(&URL_PATTERNS).as_slice(),
            mask: None,
        }
    }

    pub fn ip() -> Self {
        Self {
            kind: model_type::IP,
            patterns: LazyLock::force(&IP_PATTERNS).as_slice(),
            mask: None,
        }
    }

    pub fn guid() -> Self {
        Self {
            kind: model_type::GUID,
            patterns: LazyLock::force(&GUID_PATTERNS).as_slice(),
            mask: None,
        }
    }

    pub fn mention() -> Self {
        Self {
            kind: model_type::MENTION,
            patterns: LazyLock::force(&MENTION_PATTERNS).as_slice(),
            mask: None,
        }
    }

    pub fn hashtag() -> Self {
        Self {
            kind: model_type::HASHTAG,
            patterns: LazyLock::force(&HASHTAG_PATTERNS).as_slice(),
            mask: None,
        }
    }
}

impl Extractor for SequenceExtractor {
    fn culture(&self) -> Culture {
        Culture::English
    }

    fn extract(&self, text: &str) -> Vec<ExtractResult> {
        let mut candidates = Vec::new();
        for regex in self.patterns {
            for m in regex.find_iter(text) {
                candidates.push(ExtractResult {
                    text: m.as_str().to_string(),
                    start: m.start(),
                    length: m.len(),
                    kind: self.kind.to_string(),
                    metadata: None,
                });
            }
        }

        let mut results = select_non_overlapping(candidates);
        if let Some(mask) = self.mask {
            filter_masked(&mut results, mask, text);
        }
        results
    }
}

/// Remove os candidatos **inteiramente contidos** em um casamento da máscara.
///
/// Percorre os candidatos de trás para frente, de modo que a remoção por
/// índice permanece estável frente às remoções anteriores. A contenção exige
/// início E fim dentro do mesmo casamento: sobreposição parcial é mantida.
pub fn filter_masked(results: &mut Vec<ExtractResult>, mask: &Regex, source: &str) {
    for m in mask.find_iter(source) {
        for i in (0..results.len()).rev() {
            let candidate = &results[i];
            if candidate.start >= m.start() && candidate.start + candidate.length <= m.end() {
                results.remove(i);
            }
        }
    }
}

/// Parser de sequências: valida e repassa o trecho como valor canônico.
pub struct SequenceParser;

impl SequenceParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SequenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for SequenceParser {
    fn parse(&self, span: &ExtractResult) -> Option<ParseData> {
        let canonical = match span.kind.as_str() {
            model_type::IP => validate_ipv4(&span.text)?,
            _ => span.text.clone(),
        };

        Some(ParseData::Single(ParseResult {
            text: span.text.clone(),
            start: span.start,
            length: span.length,
            kind: span.kind.clone(),
            value: Some(serde_json::Value::String(canonical.clone())),
            resolution_text: canonical,
            metadata: None,
        }))
    }
}

/// Valida um candidato a IPv4: quatro octetos em 0..=255.
fn validate_ipv4(text: &str) -> Option<String> {
    let octets: Vec<&str> = text.split('.').collect();
    if octets.len() != 4 {
        return None;
    }
    for octet in &octets {
        octet.parse::<u8>().ok()?;
    }
    Some(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telefone_norte_americano() {
        let spans = SequenceExtractor::phone_number().extract("call 555-123-4567 now");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "555-123-4567");
        assert_eq!(spans[0].start, 5);
    }

    #[test]
    fn test_telefone_brasileiro_com_ddd() {
        let spans = SequenceExtractor::phone_number().extract("ligue (11) 98765-4321 hoje");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "(11) 98765-4321");
    }

    #[test]
    fn test_mascara_remove_span_contido() {
        // O "1234" solto dentro da máscara é artefato; o telefone real fica
        let text = "use XXX-XXX-1234 or call 555-123-4567";
        let spans = SequenceExtractor::phone_number().extract(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "555-123-4567");
    }

    #[test]
    fn test_mascara_nao_remove_sobreposicao_parcial() {
        let mask = LazyLock::force(&PHONE_MASK);
        let source = "XXX-XXX-1234567";
        // Candidato que começa dentro da máscara mas termina fora dela
        let mut results = vec![ExtractResult {
            text: "1234567".to_string(),
            start: 8,
            length: 7,
            kind: model_type::PHONE_NUMBER.to_string(),
            metadata: None,
        }];
        let mask_end = mask.find(source).map(|m| m.end()).unwrap_or(0);
        // Garante que o cenário de fato atravessa a borda da máscara
        assert!(8 < mask_end && 8 + 7 > mask_end);

        filter_masked(&mut results, mask, source);
        assert_eq!(results.len(), 1, "sobreposição parcial deve ser mantida");
    }

    #[test]
    fn test_filtro_de_mascara_e_idempotente() {
        let mask = LazyLock::force(&PHONE_MASK);
        let text = "XXX-XXX-1234 and 555-123-4567";
        let mut spans = SequenceExtractor::phone_number().extract(text);
        let after_first = spans.clone();

        filter_masked(&mut spans, mask, text);
        assert_eq!(spans, after_first);
    }

    #[test]
    fn test_email() {
        let spans = SequenceExtractor::email().extract("escreva para info@example.com.br ok");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "info@example.com.br");
    }

    #[test]
    fn test_url() {
        let spans = SequenceExtractor::url().extract("veja https://exemplo.org/docs e www.test.com");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "https://exemplo.org/docs");
        assert_eq!(spans[1].text, "www.test.com");
    }

    #[test]
    fn test_ipv4_valido_e_invalido() {
        let parser = SequenceParser::new();
        let spans = SequenceExtractor::ip().extract("hosts 192.168.0.1 e 999.1.1.1");
        assert_eq!(spans.len(), 2);

        assert!(parser.parse(&spans[0]).is_some());
        // Octeto fora de faixa: falha de item, sem pânico
        assert!(parser.parse(&spans[1]).is_none());
    }

    #[test]
    fn test_guid() {
        let spans = SequenceExtractor::guid()
            .extract("id 123e4567-e89b-12d3-a456-426614174000 criado");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_mencao_e_hashtag() {
        let mentions = SequenceExtractor::mention().extract("cc @alice_b sobre #RustLang");
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].text, "@alice_b");

        let hashtags = SequenceExtractor::hashtag().extract("cc @alice_b sobre #RustLang");
        assert_eq!(hashtags.len(), 1);
        assert_eq!(hashtags[0].text, "#RustLang");
    }
}
