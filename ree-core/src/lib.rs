//! # ree-core — Reconhecimento de Entidades Estruturadas
//!
//! Este crate implementa um pipeline determinístico para reconhecer entidades
//! estruturadas (números, ordinais, telefones, IPs, e-mails, URLs, GUIDs,
//! menções, hashtags) em texto livre, entregando valores utilizáveis por
//! máquina — não apenas os trechos crus.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui estritamente da esquerda para a direita, cada estágio
//! produzindo uma sequência nova:
//!
//! 1.  **Entrada**: Texto bruto (String).
//! 2.  **Normalização** ([`normalizer`]): pontuação tipográfica vira ASCII,
//!     preservando o mapeamento de offsets para o texto original.
//! 3.  **Extração** ([`number`], [`sequence`]): tabelas de regex e léxicos por
//!     cultura localizam os trechos candidatos com um tipo bruto.
//! 4.  **Parse** ([`number`], [`sequence`]): cada candidato vira um valor
//!     tipado com forma canônica — ou uma lista composta ("2-4" → 2 e 4).
//! 5.  **Resolução** ([`model`]): cada valor vira um registro final com o mapa
//!     ordenado de resolução (valor, subtipo, offset, relativeTo).
//!
//! Duas fronteiras concêntricas de isolamento garantem que a chamada **nunca**
//! entra em pânico: falha de consulta rende sequência vazia, falha de item
//! descarta só aquele item (ver [`model`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ree_core::{recognize_numbers, Culture};
//!
//! let results = recognize_numbers("tenho dois reais e 3 centavos", Culture::Portuguese);
//!
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].text, "dois");
//! assert_eq!(results[0].resolution.get("value"), Some("2"));
//! assert_eq!(results[1].resolution.get("value"), Some("3"));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`recognizer`]: fachada `recognize_*` por família de entidade + lote paralelo.
//! - [`model`]: orquestrador do pipeline e construtor de resolução.
//! - [`number`]: tabelas, léxicos e parsers de números/ordinais (en/pt-BR).
//! - [`sequence`]: telefones, e-mails, URLs, IPs, GUIDs e o filtro de máscara.

pub mod model;
pub mod normalizer;
pub mod number;
pub mod recognizer;
pub mod sequence;
pub mod types;

pub use model::RecognizerModel;
pub use recognizer::{
    recognize, recognize_batch, recognize_emails, recognize_guids, recognize_hashtags,
    recognize_ips, recognize_mentions, recognize_numbers, recognize_ordinals,
    recognize_phone_numbers, recognize_urls, EntityKind,
};
pub use types::{
    Culture, ExtractResult, Extractor, ModelResult, OrdinalMetadata, ParseData, ParseResult,
    Parser, Resolution,
};
