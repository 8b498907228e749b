//! # Modelo de Dados do Pipeline
//!
//! Define as três entidades que fluem pelo pipeline de reconhecimento,
//! sempre da esquerda para a direita:
//!
//! | Entidade        | Produzida por       | Papel                                      |
//! |-----------------|---------------------|--------------------------------------------|
//! | `ExtractResult` | Extratores          | Trecho candidato com tipo bruto            |
//! | `ParseResult`   | Parsers             | Valor tipado + forma canônica              |
//! | `ModelResult`   | Construtor de resolução | Registro final visível ao consumidor   |
//!
//! Nenhum estágio altera a saída do anterior; cada um produz uma sequência
//! nova. As três entidades são criadas a cada chamada e descartadas ao final —
//! apenas as tabelas de padrões/léxicos (estáticas) sobrevivem entre chamadas.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Culturas suportadas pelos extratores/parsers numéricos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Culture {
    /// Inglês: separador decimal `.`, milhar `,`, léxico "two", "third", "last"...
    English,
    /// Português Brasileiro: separador decimal `,`, milhar `.`, léxico "dois", "terceiro", "último"...
    Portuguese,
}

impl Culture {
    /// Identidade textual da cultura (usada na trava de subtipo, ver [`SUBTYPE_CULTURES`]).
    pub fn name(&self) -> &'static str {
        match self {
            Culture::English => "English",
            Culture::Portuguese => "Portuguese",
        }
    }
}

/// Nomes de tipo expostos nos registros finais (`ModelResult::type_name`).
pub mod model_type {
    pub const NUMBER: &str = "number";
    pub const ORDINAL: &str = "ordinal";
    /// Ordinal relativo a um ponto de referência ("second to last", "penúltimo").
    pub const ORDINAL_RELATIVE: &str = "ordinal.relative";
    pub const PHONE_NUMBER: &str = "phonenumber";
    pub const EMAIL: &str = "email";
    pub const URL: &str = "url";
    pub const IP: &str = "ip";
    pub const GUID: &str = "guid";
    pub const MENTION: &str = "mention";
    pub const HASHTAG: &str = "hashtag";
}

/// Tipos refinados atribuídos pelos parsers numéricos (candidatos a `subtype`).
pub mod number_kind {
    pub const INTEGER: &str = "integer";
    pub const DECIMAL: &str = "decimal";
    pub const FRACTION: &str = "fraction";
    pub const ORDINAL: &str = "ordinal";
    /// Faixa "2-4": fonte de resultado composto (explode em dois valores).
    pub const RANGE: &str = "range";
}

/// Chaves do mapa de resolução, na ordem canônica de inserção.
pub mod resolution_key {
    pub const VALUE: &str = "value";
    pub const SUBTYPE: &str = "subtype";
    pub const OFFSET: &str = "offset";
    pub const RELATIVE_TO: &str = "relativeTo";
}

/// Tipos refinados que podem ser reportados como `subtype` na resolução.
pub const VALID_SUBTYPES: &[&str] = &[
    number_kind::INTEGER,
    number_kind::DECIMAL,
    number_kind::FRACTION,
];

/// Culturas cuja gramática distingue os subtipos com segurança.
///
/// Outras culturas (como o alemão, e aqui o português) não separam de forma
/// confiável "integer" de "decimal" em todos os padrões, então o campo
/// `subtype` é omitido em vez de fabricado.
pub const SUBTYPE_CULTURES: &[&str] = &["English", "Swedish"];

/// Metadados de ordinal carregados do extrator até a resolução.
///
/// Presentes para **todos** os ordinais: os absolutos ("terceiro") carregam
/// `offset = valor` e `relative_to = "start"`; os relativos ("penúltimo")
/// carregam o deslocamento do léxico e `is_ordinal_relative = true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrdinalMetadata {
    pub is_ordinal_relative: bool,
    /// Deslocamento assinado, como string (ex: "-2", "3").
    pub offset: String,
    /// Ponto de referência: "start", "end" ou "current".
    pub relative_to: String,
}

/// Um trecho candidato localizado por um extrator.
///
/// Os offsets são em **bytes do texto original** e `start + length` cai sempre
/// em fronteira de caractere, de modo que `&texto[start..start + length]`
/// reproduz `text` exatamente. Candidatos de uma mesma chamada de extração
/// nunca se sobrepõem (contrato do extrator, ver [`select_non_overlapping`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// O trecho de texto capturado.
    pub text: String,
    /// Byte inicial no texto original (inclusive).
    pub start: usize,
    /// Comprimento em bytes (> 0).
    pub length: usize,
    /// Tipo bruto atribuído pela tabela de padrões (ex: "integer", "range").
    pub kind: String,
    /// Metadados opcionais anexados na extração (ordinais relativos).
    pub metadata: Option<OrdinalMetadata>,
}

/// Um valor tipado produzido por um parser a partir de um candidato.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub text: String,
    pub start: usize,
    pub length: usize,
    /// Tipo refinado pelo parser (ex: "integer" vs "decimal").
    pub kind: String,
    /// Carga tipada opcional (número ou texto canônico).
    pub value: Option<serde_json::Value>,
    /// Forma canônica em string do valor (vai para `resolution["value"]`).
    pub resolution_text: String,
    pub metadata: Option<OrdinalMetadata>,
}

/// Resultado de um parse: um valor único ou uma lista composta.
///
/// União etiquetada em vez de carga opaca testada em runtime: o orquestrador
/// achata explicitamente sobre as duas variantes (uma faixa "2-4" vira dois
/// valores emendados na sequência de trabalho, no lugar do candidato).
#[derive(Debug, Clone, PartialEq)]
pub enum ParseData {
    Single(ParseResult),
    Composite(Vec<ParseResult>),
}

/// Mapa de resolução com ordem de inserção preservada.
///
/// A ordem das chaves é contratual (`value`, `subtype`, `offset`,
/// `relativeTo`) e deve ser reproduzida byte a byte na serialização, por isso
/// um `Vec` de pares em vez de um mapa ordenado por chave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    entries: Vec<(String, String)>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insere ou substitui (mantendo a posição original da chave).
    pub fn insert(&mut self, key: &str, value: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pares (chave, valor) na ordem canônica de inserção.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Resolution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResolutionVisitor;

        impl<'de> Visitor<'de> for ResolutionVisitor {
            type Value = Resolution;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("um mapa chave-valor de strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Resolution, A::Error> {
                let mut resolution = Resolution::new();
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    resolution.insert(&k, v);
                }
                Ok(resolution)
            }
        }

        deserializer.deserialize_map(ResolutionVisitor)
    }
}

/// O registro final visível ao consumidor.
///
/// `start` e `end` são **inclusivos** e sempre contidos nos limites do texto
/// original, iguais ao span do [`ParseResult`] que originou o registro.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResult {
    pub text: String,
    pub start: usize,
    /// Byte final, inclusive (`start + length - 1`).
    pub end: usize,
    /// Nome do tipo exposto (ex: "number", "ordinal.relative").
    pub type_name: String,
    pub resolution: Resolution,
}

/// Capacidade de extração: localiza candidatos para uma família de entidades.
///
/// Deve ser determinística e não entrar em pânico para nenhuma entrada — um
/// pânico aqui é capturado pelo orquestrador, mas tratado como bug do extrator.
pub trait Extractor: Send + Sync {
    /// Identidade de cultura do extrator (decide a trava de subtipo).
    fn culture(&self) -> Culture;

    fn extract(&self, text: &str) -> Vec<ExtractResult>;
}

/// Capacidade de parse: converte um candidato em valor tipado (possivelmente vários).
///
/// `None` indica falha de item: o candidato é descartado sem afetar os irmãos.
pub trait Parser: Send + Sync {
    fn parse(&self, span: &ExtractResult) -> Option<ParseData>;
}

/// Resolve sobreposições entre casamentos de padrões diferentes de um mesmo
/// extrator: o casamento mais longo (e, em empate, o mais à esquerda) vence.
///
/// Garante o contrato de que candidatos de uma mesma chamada nunca se
/// sobrepõem. Candidatos de extratores *diferentes* nunca passam por aqui.
pub fn select_non_overlapping(mut candidates: Vec<ExtractResult>) -> Vec<ExtractResult> {
    candidates.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.length.cmp(&a.length))
    });

    let mut selected: Vec<ExtractResult> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let overlaps = selected.iter().any(|kept| {
            candidate.start < kept.start + kept.length && kept.start < candidate.start + candidate.length
        });
        if !overlaps {
            selected.push(candidate);
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, length: usize, kind: &str) -> ExtractResult {
        ExtractResult {
            text: "x".repeat(length),
            start,
            length,
            kind: kind.to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_resolution_preserva_ordem_de_insercao() {
        let mut resolution = Resolution::new();
        resolution.insert(resolution_key::VALUE, "3".to_string());
        resolution.insert(resolution_key::SUBTYPE, "integer".to_string());
        resolution.insert(resolution_key::OFFSET, "3".to_string());
        resolution.insert(resolution_key::RELATIVE_TO, "start".to_string());

        let json = serde_json::to_string(&resolution).unwrap();
        assert_eq!(
            json,
            r#"{"value":"3","subtype":"integer","offset":"3","relativeTo":"start"}"#
        );
    }

    #[test]
    fn test_resolution_substitui_mantendo_posicao() {
        let mut resolution = Resolution::new();
        resolution.insert(resolution_key::VALUE, "old".to_string());
        resolution.insert(resolution_key::OFFSET, "-1".to_string());
        // Sobrescrita do valor (síntese de ordinal relativo) não muda a ordem
        resolution.insert(resolution_key::VALUE, "end-1".to_string());

        let keys: Vec<&str> = resolution.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["value", "offset"]);
        assert_eq!(resolution.get("value"), Some("end-1"));
    }

    #[test]
    fn test_resolution_roundtrip_json() {
        let mut resolution = Resolution::new();
        resolution.insert("value", "42".to_string());
        resolution.insert("subtype", "integer".to_string());

        let json = serde_json::to_string(&resolution).unwrap();
        let back: Resolution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resolution);
    }

    #[test]
    fn test_model_result_serializa_type_name_camel_case() {
        let result = ModelResult {
            text: "two".to_string(),
            start: 0,
            end: 2,
            type_name: "number".to_string(),
            resolution: Resolution::new(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains(r#""typeName":"number""#));
    }

    #[test]
    fn test_select_non_overlapping_prefere_mais_longo() {
        // "1,234": o padrão agrupado casa (0,5); o padrão simples casa (0,1) e (2,3)
        let candidates = vec![span(0, 1, "integer"), span(0, 5, "integer"), span(2, 3, "integer")];
        let selected = select_non_overlapping(candidates);
        assert_eq!(selected.len(), 1);
        assert_eq!((selected[0].start, selected[0].length), (0, 5));
    }

    #[test]
    fn test_select_non_overlapping_mantem_disjuntos_em_ordem() {
        let candidates = vec![span(10, 3, "a"), span(0, 3, "b")];
        let selected = select_non_overlapping(candidates);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].start, 0);
        assert_eq!(selected[1].start, 10);
    }
}
