//! # Normalizador de Texto
//!
//! Pré-processa a consulta antes da extração: aspas tipográficas viram aspas
//! ASCII, travessões viram hífen, espaço inflexível vira espaço comum e,
//! opcionalmente, o texto é rebaixado para minúsculas.
//!
//! A substituição é sempre **caractere a caractere** (nunca insere nem remove
//! caracteres), mas como os substitutos ASCII podem ter menos bytes UTF-8 que
//! os originais (ex: `’` tem 3 bytes, `'` tem 1), o resultado carrega um mapa
//! de bytes de volta para o texto original. Os extratores casam padrões sobre
//! o texto normalizado e o orquestrador re-mapeia cada span para os offsets
//! do texto original — os registros finais sempre apontam para o texto cru.

/// Texto normalizado + mapa de offsets de volta ao texto original.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// O texto após as substituições.
    pub text: String,
    /// `map[i]` = byte no texto original correspondente ao byte `i` do texto
    /// normalizado. Tem `text.len() + 1` entradas (a última mapeia o fim).
    map: Vec<usize>,
}

impl Normalized {
    /// Re-mapeia um intervalo `[start, end)` do texto normalizado para o
    /// intervalo correspondente no texto original.
    pub fn to_original(&self, start: usize, end: usize) -> (usize, usize) {
        (self.map[start], self.map[end])
    }
}

/// Pré-processa o texto preservando a correspondência de offsets.
///
/// Com `case_sensitive = true` (o caminho de produção do pipeline) apenas a
/// pontuação é normalizada; com `false`, cada caractere também é rebaixado
/// para sua minúscula simples (mapeamentos 1-para-N são mantidos como estão,
/// para não quebrar a correspondência caractere a caractere).
pub fn preprocess(text: &str, case_sensitive: bool) -> Normalized {
    let mut out = String::with_capacity(text.len());
    let mut map = Vec::with_capacity(text.len() + 1);

    for (offset, ch) in text.char_indices() {
        let replaced = substitute(ch, case_sensitive);
        let before = out.len();
        out.push(replaced);
        for _ in before..out.len() {
            map.push(offset);
        }
    }
    map.push(text.len());

    Normalized { text: out, map }
}

/// Substituições de pontuação aplicadas também pelos parsers sobre trechos
/// individuais (ex: "twenty–first" com meia-risca precisa virar hífen antes
/// da composição léxica).
pub fn fold_chars(text: &str) -> String {
    text.chars().map(|ch| substitute(ch, true)).collect()
}

fn substitute(ch: char, case_sensitive: bool) -> char {
    let folded = match ch {
        '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
        '\u{00A0}' => ' ',
        other => other,
    };

    if case_sensitive {
        folded
    } else {
        let mut lower = folded.to_lowercase();
        match (lower.next(), lower.next()) {
            // Só aceita minúsculas 1-para-1; casos como 'İ' ficam intactos
            (Some(single), None) => single,
            _ => folded,
        }
    }
}
