//! # Modelo — Orquestrador do Pipeline e Construtor de Resolução
//!
//! O modelo compõe os estágios na ordem fixa:
//!
//! 1. **Normalização** do texto (sensível a caixa, preservando offsets).
//! 2. **Extração** dos candidatos sobre o texto normalizado, com re-mapeamento
//!    de cada span para os offsets do texto original.
//! 3. **Parse** de cada candidato — resultados compostos são emendados na
//!    sequência de trabalho no lugar do candidato, os únicos são anexados.
//! 4. **Resolução** de cada valor em um registro final (ou descarte).
//!
//! ## Isolamento de falhas em duas fronteiras concêntricas
//!
//! - **Consulta**: qualquer pânico escapando dos passos 2-4 é engolido e a
//!   chamada devolve uma sequência vazia — o texto estranho de uma consulta
//!   nunca derruba um lote de consultas independentes do chamador.
//! - **Item**: qualquer falha ao resolver um único valor rende `None` para
//!   aquele item apenas; os irmãos não são afetados.
//!
//! Nenhuma das fronteiras afeta a sequência retornada além do descarte; as
//! falhas engolidas vão para o canal de diagnóstico (`tracing`).

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::normalizer::preprocess;
use crate::types::{
    model_type, resolution_key, Extractor, ModelResult, ParseData, ParseResult, Parser,
    Resolution, SUBTYPE_CULTURES, VALID_SUBTYPES,
};

/// Um modelo de reconhecimento: extrator + parser + nome de tipo exposto.
///
/// As famílias de extratores/parsers são objetos de capacidade selecionados na
/// construção (um por tipo de entidade/cultura), nunca cadeias de herança;
/// cada variante é testável isoladamente contra o mesmo contrato.
pub struct RecognizerModel {
    model_type: &'static str,
    extractor: Box<dyn Extractor>,
    parser: Box<dyn Parser>,
}

impl RecognizerModel {
    pub fn new(
        model_type: &'static str,
        extractor: Box<dyn Extractor>,
        parser: Box<dyn Parser>,
    ) -> Self {
        Self {
            model_type,
            extractor,
            parser,
        }
    }

    /// Nome do tipo declarado pelo modelo ("number", "ordinal", ...).
    pub fn model_type(&self) -> &'static str {
        self.model_type
    }

    /// Reconhece todas as entidades da família deste modelo no texto.
    ///
    /// Nunca entra em pânico: no pior caso retorna a sequência vazia. Os
    /// registros saem **na ordem de produção** dos candidatos (sem reordenar).
    pub fn parse(&self, query: &str) -> Vec<ModelResult> {
        match catch_unwind(AssertUnwindSafe(|| self.parse_inner(query))) {
            Ok(results) => results,
            Err(_) => {
                // Fronteira de consulta: texto estranho não derruba o chamador
                warn!(model = self.model_type, "pânico engolido no pipeline; retornando sequência vazia");
                Vec::new()
            }
        }
    }

    fn parse_inner(&self, query: &str) -> Vec<ModelResult> {
        // === Passo 1: Normalização (sensível a caixa) ===
        let normalized = preprocess(query, true);

        // === Passo 2: Extração + re-mapeamento para o texto original ===
        let mut extractions = self.extractor.extract(&normalized.text);
        for span in &mut extractions {
            let (start, end) = normalized.to_original(span.start, span.start + span.length);
            span.start = start;
            span.length = end - start;
            span.text = query[start..end].to_string();
        }

        // === Passo 3: Parse, achatando resultados compostos ===
        let mut parsed: Vec<ParseResult> = Vec::with_capacity(extractions.len());
        for span in &extractions {
            match self.parser.parse(span) {
                Some(ParseData::Single(result)) => parsed.push(result),
                Some(ParseData::Composite(results)) => parsed.extend(results),
                None => {
                    debug!(model = self.model_type, text = %span.text, "candidato descartado pelo parser");
                }
            }
        }

        // === Passo 4: Resolução, descartando falhas de item ===
        parsed
            .iter()
            .filter_map(|result| self.build_model_result(result))
            .collect()
    }

    /// Constrói o registro final de um valor, ou `None` em falha de item.
    ///
    /// Regras, nesta precedência:
    /// 1. `end = start + length - 1` (inclusivo).
    /// 2. Valor presente → `resolution["value"] = resolution_text`.
    /// 3. Trava de subtipo: só reporta `subtype` se o tipo refinado **e** a
    ///    cultura do extrator estiverem nas listas de permissão.
    /// 4. Ordinais: relativos trocam o tipo para "ordinal.relative" e têm o
    ///    valor sintetizado de `relativeTo` + sinal + `offset`; todos os
    ///    ordinais reportam `offset` e `relativeTo`.
    fn build_model_result(&self, parsed: &ParseResult) -> Option<ModelResult> {
        let build = || -> Option<ModelResult> {
            let end = (parsed.start + parsed.length).checked_sub(1)?;

            let mut resolution = Resolution::new();
            if parsed.value.is_some() {
                resolution.insert(resolution_key::VALUE, parsed.resolution_text.clone());
            }

            let extractor_supports_subtype =
                SUBTYPE_CULTURES.contains(&self.extractor.culture().name());
            if !parsed.kind.is_empty()
                && VALID_SUBTYPES.contains(&parsed.kind.as_str())
                && extractor_supports_subtype
            {
                resolution.insert(resolution_key::SUBTYPE, parsed.kind.clone());
            }

            let type_name = if self.model_type == model_type::ORDINAL {
                let metadata = parsed.metadata.as_ref()?;
                let specific = if metadata.is_ordinal_relative {
                    // Valor recomputado, não copiado do parser: referência + sinal + magnitude
                    let sign = if metadata.offset.starts_with('-') { "" } else { "+" };
                    resolution.insert(
                        resolution_key::VALUE,
                        format!("{}{}{}", metadata.relative_to, sign, metadata.offset),
                    );
                    model_type::ORDINAL_RELATIVE
                } else {
                    self.model_type
                };

                resolution.insert(resolution_key::OFFSET, metadata.offset.clone());
                resolution.insert(resolution_key::RELATIVE_TO, metadata.relative_to.clone());
                specific
            } else {
                self.model_type
            };

            Some(ModelResult {
                text: parsed.text.clone(),
                start: parsed.start,
                end,
                type_name: type_name.to_string(),
                resolution,
            })
        };

        match catch_unwind(AssertUnwindSafe(build)) {
            Ok(result) => result,
            Err(_) => {
                // Fronteira de item: os irmãos deste valor seguem intactos
                warn!(model = self.model_type, "pânico engolido ao resolver um item");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::{NumberExtractor, NumberParser, OrdinalExtractor, OrdinalParser};
    use crate::types::{Culture, ExtractResult, OrdinalMetadata, ParseData};

    fn number_model(culture: Culture) -> RecognizerModel {
        RecognizerModel::new(
            model_type::NUMBER,
            Box::new(NumberExtractor::new(culture)),
            Box::new(NumberParser::new(culture)),
        )
    }

    fn ordinal_model(culture: Culture) -> RecognizerModel {
        RecognizerModel::new(
            model_type::ORDINAL,
            Box::new(OrdinalExtractor::new(culture)),
            Box::new(OrdinalParser::new(culture)),
        )
    }

    #[test]
    fn test_cenario_dois_dolares_e_3_centavos() {
        let model = number_model(Culture::English);
        let results = model.parse("I have two dollars and 3 cents");

        assert_eq!(results.len(), 2);

        assert_eq!(results[0].text, "two");
        assert_eq!(results[0].type_name, "number");
        assert_eq!(results[0].resolution.get("value"), Some("2"));

        assert_eq!(results[1].text, "3");
        assert_eq!(results[1].resolution.get("value"), Some("3"));

        // Ordem esquerda→direita e spans disjuntos
        assert!(results[0].end < results[1].start);
    }

    #[test]
    fn test_spans_reproduzem_o_texto_original() {
        let text = "pay 1,234.56 now or thirty five later";
        let model = number_model(Culture::English);

        for record in model.parse(text) {
            assert!(record.start <= record.end);
            assert!(record.end < text.len());
            assert_eq!(&text[record.start..=record.end], record.text);
        }
    }

    #[test]
    fn test_normalizacao_nao_desloca_offsets() {
        // Aspas tipográficas de 3 bytes antes do número
        let text = "disse \u{201C}two\u{201D} vezes";
        let model = number_model(Culture::English);
        let results = model.parse(text);

        assert_eq!(results.len(), 1);
        let record = &results[0];
        assert_eq!(record.text, "two");
        assert_eq!(&text[record.start..=record.end], "two");
    }

    #[test]
    fn test_trava_de_subtipo_ingles_presente() {
        let model = number_model(Culture::English);
        let results = model.parse("I counted 42 sheep");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolution.get("subtype"), Some("integer"));
    }

    #[test]
    fn test_trava_de_subtipo_portugues_ausente() {
        let model = number_model(Culture::Portuguese);
        let results = model.parse("contei 42 ovelhas");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolution.get("value"), Some("42"));
        // Português está fora da lista de culturas que distinguem subtipos
        assert!(!results[0].resolution.contains_key("subtype"));
    }

    #[test]
    fn test_ordinal_absoluto() {
        let model = ordinal_model(Culture::English);
        let results = model.parse("she finished third");

        assert_eq!(results.len(), 1);
        let record = &results[0];
        assert_eq!(record.type_name, "ordinal");
        assert_eq!(record.resolution.get("value"), Some("3"));
        assert_eq!(record.resolution.get("offset"), Some("3"));
        assert_eq!(record.resolution.get("relativeTo"), Some("start"));
        // Ordinal não é subtipo reportável
        assert!(!record.resolution.contains_key("subtype"));
    }

    #[test]
    fn test_ordinal_relativo_sintetiza_valor_negativo() {
        let model = ordinal_model(Culture::English);
        let results = model.parse("take the third to last seat");

        assert_eq!(results.len(), 1);
        let record = &results[0];
        assert_eq!(record.type_name, "ordinal.relative");
        // Offset já assinado: nenhum sinal extra é inserido
        assert_eq!(record.resolution.get("value"), Some("end-2"));
        assert_eq!(record.resolution.get("offset"), Some("-2"));
        assert_eq!(record.resolution.get("relativeTo"), Some("end"));
    }

    #[test]
    fn test_ordinal_relativo_sintetiza_valor_positivo() {
        // Parser de teste que injeta um offset positivo arbitrário
        struct OneSpan;
        impl crate::types::Extractor for OneSpan {
            fn culture(&self) -> Culture {
                Culture::English
            }
            fn extract(&self, _text: &str) -> Vec<ExtractResult> {
                vec![ExtractResult {
                    text: "x".to_string(),
                    start: 0,
                    length: 1,
                    kind: "ordinal".to_string(),
                    metadata: None,
                }]
            }
        }
        struct FixedMetadata;
        impl Parser for FixedMetadata {
            fn parse(&self, span: &ExtractResult) -> Option<ParseData> {
                Some(ParseData::Single(ParseResult {
                    text: span.text.clone(),
                    start: span.start,
                    length: span.length,
                    kind: "ordinal".to_string(),
                    value: None,
                    resolution_text: String::new(),
                    metadata: Some(OrdinalMetadata {
                        is_ordinal_relative: true,
                        offset: "3".to_string(),
                        relative_to: "end".to_string(),
                    }),
                }))
            }
        }

        let model = RecognizerModel::new(
            model_type::ORDINAL,
            Box::new(OneSpan),
            Box::new(FixedMetadata),
        );
        let results = model.parse("x");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resolution.get("value"), Some("end+3"));
    }

    #[test]
    fn test_faixa_explode_em_dois_registros() {
        let model = number_model(Culture::English);
        let results = model.parse("read pages 2-4 today");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "2");
        assert_eq!(results[1].text, "4");
        assert_eq!(results[0].resolution.get("value"), Some("2"));
        assert_eq!(results[1].resolution.get("value"), Some("4"));
    }

    #[test]
    fn test_fronteira_de_consulta_engole_panico() {
        struct PanickingExtractor;
        impl Extractor for PanickingExtractor {
            fn culture(&self) -> Culture {
                Culture::English
            }
            fn extract(&self, _text: &str) -> Vec<ExtractResult> {
                panic!("bug de extrator");
            }
        }

        let model = RecognizerModel::new(
            model_type::NUMBER,
            Box::new(PanickingExtractor),
            Box::new(NumberParser::new(Culture::English)),
        );

        assert!(model.parse("anything").is_empty());
    }

    #[test]
    fn test_fronteira_de_item_preserva_irmaos() {
        // Extrator fixo com um span; parser que devolve um composto com um
        // item válido e um item defeituoso (comprimento zero)
        struct OneSpan;
        impl Extractor for OneSpan {
            fn culture(&self) -> Culture {
                Culture::English
            }
            fn extract(&self, _text: &str) -> Vec<ExtractResult> {
                vec![ExtractResult {
                    text: "2-4".to_string(),
                    start: 0,
                    length: 3,
                    kind: "range".to_string(),
                    metadata: None,
                }]
            }
        }
        struct HalfBroken;
        impl Parser for HalfBroken {
            fn parse(&self, _span: &ExtractResult) -> Option<ParseData> {
                let good = ParseResult {
                    text: "2".to_string(),
                    start: 0,
                    length: 1,
                    kind: "integer".to_string(),
                    value: Some(serde_json::Value::from(2.0)),
                    resolution_text: "2".to_string(),
                    metadata: None,
                };
                let broken = ParseResult {
                    length: 0, // dispara a falha de item no construtor
                    ..good.clone()
                };
                Some(ParseData::Composite(vec![good, broken]))
            }
        }

        let model = RecognizerModel::new(
            model_type::NUMBER,
            Box::new(OneSpan),
            Box::new(HalfBroken),
        );
        let results = model.parse("2-4");

        assert_eq!(results.len(), 1, "o irmão válido deve sobreviver");
        assert_eq!(results[0].text, "2");
    }

    #[test]
    fn test_consulta_vazia() {
        let model = number_model(Culture::English);
        assert!(model.parse("").is_empty());
    }

    #[test]
    fn test_ordem_canonica_das_chaves_da_resolucao() {
        let model = ordinal_model(Culture::English);
        let results = model.parse("the second to last one");

        assert_eq!(results.len(), 1);
        let keys: Vec<&str> = results[0].resolution.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["value", "offset", "relativeTo"]);
    }
}
