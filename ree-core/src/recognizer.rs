//! # Fachada de Reconhecimento
//!
//! Pontos de entrada de alto nível: uma função `recognize_*` por família de
//! entidade, todas devolvendo a mesma sequência de [`ModelResult`]. Os modelos
//! são baratos de construir (as tabelas de padrões são estáticas e
//! compartilhadas), então cada chamada monta o seu e descarta ao final.
//!
//! Chamadas independentes são perfeitamente paralelas — o único estado
//! compartilhado são as tabelas imutáveis — e [`recognize_batch`] explora isso
//! com `rayon` para lotes de textos.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::RecognizerModel;
use crate::number::{NumberExtractor, NumberParser, OrdinalExtractor, OrdinalParser};
use crate::sequence::{SequenceExtractor, SequenceParser};
use crate::types::{model_type, Culture, ModelResult};

/// Famílias de entidade disponíveis para reconhecimento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Number,
    Ordinal,
    PhoneNumber,
    Email,
    Url,
    Ip,
    Guid,
    Mention,
    Hashtag,
}

impl EntityKind {
    /// Monta o modelo desta família. A cultura só afeta números e ordinais;
    /// as sequências (telefone, e-mail...) são definidas por formato.
    pub fn model(&self, culture: Culture) -> RecognizerModel {
        match self {
            EntityKind::Number => RecognizerModel::new(
                model_type::NUMBER,
                Box::new(NumberExtractor::new(culture)),
                Box::new(NumberParser::new(culture)),
            ),
            EntityKind::Ordinal => RecognizerModel::new(
                model_type::ORDINAL,
                Box::new(OrdinalExtractor::new(culture)),
                Box::new(OrdinalParser::new(culture)),
            ),
            EntityKind::PhoneNumber => sequence_model(
                model_type::PHONE_NUMBER,
                SequenceExtractor::phone_number(),
            ),
            EntityKind::Email => sequence_model(model_type::EMAIL, SequenceExtractor::email()),
            EntityKind::Url => sequence_model(model_type::URL, SequenceExtractor::url()),
            EntityKind::Ip => sequence_model(model_type::IP, SequenceExtractor::ip()),
            EntityKind::Guid => sequence_model(model_type::GUID, SequenceExtractor::guid()),
            EntityKind::Mention => {
                sequence_model(model_type::MENTION, SequenceExtractor::mention())
            }
            EntityKind::Hashtag => {
                sequence_model(model_type::HASHTAG, SequenceExtractor::hashtag())
            }
        }
    }
}

fn sequence_model(type_name: &'static str, extractor: SequenceExtractor) -> RecognizerModel {
    RecognizerModel::new(type_name, Box::new(extractor), Box::new(SequenceParser::new()))
}

/// Reconhece uma família de entidades em um texto.
pub fn recognize(text: &str, kind: EntityKind, culture: Culture) -> Vec<ModelResult> {
    kind.model(culture).parse(text)
}

/// Reconhece números cardinais (dígitos, decimais, frações, por extenso).
pub fn recognize_numbers(text: &str, culture: Culture) -> Vec<ModelResult> {
    recognize(text, EntityKind::Number, culture)
}

/// Reconhece ordinais absolutos e relativos.
pub fn recognize_ordinals(text: &str, culture: Culture) -> Vec<ModelResult> {
    recognize(text, EntityKind::Ordinal, culture)
}

pub fn recognize_phone_numbers(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::PhoneNumber, Culture::English)
}

pub fn recognize_emails(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Email, Culture::English)
}

pub fn recognize_urls(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Url, Culture::English)
}

pub fn recognize_ips(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Ip, Culture::English)
}

pub fn recognize_guids(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Guid, Culture::English)
}

pub fn recognize_mentions(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Mention, Culture::English)
}

pub fn recognize_hashtags(text: &str) -> Vec<ModelResult> {
    recognize(text, EntityKind::Hashtag, Culture::English)
}

/// Reconhece a mesma família em um lote de textos, em paralelo.
///
/// Equivalente a mapear [`recognize`] sobre o lote: o modelo é construído uma
/// vez e compartilhado somente-leitura entre as threads do pool.
pub fn recognize_batch<T: AsRef<str> + Sync>(
    texts: &[T],
    kind: EntityKind,
    culture: Culture,
) -> Vec<Vec<ModelResult>> {
    let model = kind.model(culture);
    texts
        .par_iter()
        .map(|text| model.parse(text.as_ref()))
        .collect()
}
