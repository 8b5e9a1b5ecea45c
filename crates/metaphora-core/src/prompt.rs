//! Prompt section describing the metaphor taxonomy to an LLM adjudicator.
//!
//! Weights and multipliers are rendered from [`MetaphorLevel::base_weight`] and
//! [`MetaphorType::multiplier`], so the prompt cannot drift from the scorer.

use std::fmt::Write as _;

use crate::{MetaphorLevel, MetaphorType};

/// The section is inserted immediately before this line of the system prompt.
pub const RESPONSE_FORMAT_MARKER: &str = "ФОРМАТ ОТВЕТА (строго JSON):";

fn level_description(level: MetaphorLevel) -> (&'static str, &'static [&'static str]) {
    match level {
        MetaphorLevel::ExplicitTerm => (
            "Прямой термин теории",
            &["Пример: \"интегрированная информация\", \"предиктивное кодирование\""],
        ),
        MetaphorLevel::ScientificMetaphor => (
            "Метафора в научном дискурсе",
            &["Пример: \"мозг как компьютер\", \"сознание как театр разума\""],
        ),
        MetaphorLevel::MetaMetaphor => (
            "Художественная интерпретация научной метафоры",
            &[
                "Пример: \"алгоритм как художник\", \"нейросеть как сознание\"",
                "Это ключевой уровень для AI-арта!",
            ],
        ),
        MetaphorLevel::NestedMetaphor => ("Многослойная метафорическая трансформация", &[]),
    }
}

fn type_description(metaphor_type: MetaphorType) -> &'static str {
    match metaphor_type {
        MetaphorType::Ontological => "О природе сознания/разума",
        MetaphorType::Structural => "О структуре/архитектуре",
        MetaphorType::Orientational => "О пространственно-временных отношениях",
        MetaphorType::Decorative => "Декоративная, не теоретическая",
    }
}

const META_METAPHOR_GUIDANCE: &str = "\
КРИТИЧЕСКИ ВАЖНО для AI-арта:
- Если художник использует технический термин метафорически → META_METAPHOR
- Если работа превращает научную концепцию в художественный образ → META_METAPHOR
- Например: \"нейросеть генерирует образы\" может быть метафорой творчества (PRED/COMP)
";

const THEORY_PATTERNS: &[(&str, &[&str])] = &[
    (
        "COMP",
        &[
            "\"алгоритм как автор/художник\"",
            "\"данные как материал искусства\"",
            "\"код как язык творчества\"",
        ],
    ),
    (
        "PRED",
        &[
            "\"генеративная модель как воображение\"",
            "\"ошибка предсказания как креативность\"",
            "\"синтез восприятия как художественный акт\"",
        ],
    ),
    (
        "ENACT",
        &[
            "\"тело как медиум познания\"",
            "\"жест/движение как мысль\"",
            "\"материальность разума\"",
        ],
    ),
    (
        "EMERG",
        &[
            "\"роевой разум\"",
            "\"коллективное творчество\"",
            "\"спонтанный порядок из хаоса\"",
        ],
    ),
];

const CLOSING_REQUIREMENTS: &str = "\
При обнаружении META_METAPHOR обязательно указывай:
1. Исходную научную метафору
2. Художественную трансформацию
3. Связь с теорией сознания
";

/// Render the metaphor-analysis instructions for a system prompt.
pub fn generate_prompt_section() -> String {
    let mut out = String::from("\nРАСШИРЕННЫЙ АНАЛИЗ МЕТАФОР:\n\n");
    out.push_str("При анализе метафор учитывай ЧЕТЫРЕ УРОВНЯ:\n\n");

    for (i, level) in MetaphorLevel::ALL.iter().enumerate() {
        let (title, examples) = level_description(*level);
        let _ = writeln!(
            out,
            "{}. {} (вес {:.1}): {}",
            i + 1,
            level.as_str().to_uppercase(),
            level.base_weight(),
            title
        );
        for example in examples {
            let _ = writeln!(out, "   - {}", example);
        }
        out.push('\n');
    }

    out.push_str("ТИП МЕТАФОРЫ (влияет на вес):\n");
    for metaphor_type in MetaphorType::ALL {
        let _ = writeln!(
            out,
            "- {} (×{:.1}): {}",
            metaphor_type.as_str().to_uppercase(),
            metaphor_type.multiplier(),
            type_description(metaphor_type)
        );
    }
    out.push('\n');

    out.push_str(META_METAPHOR_GUIDANCE);
    out.push_str("\nПАТТЕРНЫ МЕТАФОР МЕТАФОР по теориям:\n\n");
    for (theory, patterns) in THEORY_PATTERNS {
        let _ = writeln!(out, "{} → META_METAPHOR:", theory);
        for pattern in *patterns {
            let _ = writeln!(out, "- {}", pattern);
        }
        out.push('\n');
    }

    out.push_str(CLOSING_REQUIREMENTS);
    out
}

/// Insert `section` right before [`RESPONSE_FORMAT_MARKER`] in `base_prompt`.
///
/// Every occurrence of the marker is prefixed. A prompt without the marker is
/// returned unchanged.
pub fn enhance_system_prompt(base_prompt: &str, section: &str) -> String {
    base_prompt.replace(
        RESPONSE_FORMAT_MARKER,
        &format!("{}\n\n{}", section, RESPONSE_FORMAT_MARKER),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_lists_levels_with_weights() {
        let section = generate_prompt_section();
        assert!(section.contains("1. EXPLICIT_TERM (вес 1.0)"));
        assert!(section.contains("2. SCIENTIFIC_METAPHOR (вес 0.7)"));
        assert!(section.contains("3. META_METAPHOR (вес 0.8)"));
        assert!(section.contains("4. NESTED_METAPHOR (вес 0.5)"));
    }

    #[test]
    fn section_lists_types_with_multipliers() {
        let section = generate_prompt_section();
        assert!(section.contains("- ONTOLOGICAL (×1.2)"));
        assert!(section.contains("- STRUCTURAL (×1.0)"));
        assert!(section.contains("- ORIENTATIONAL (×0.8)"));
        assert!(section.contains("- DECORATIVE (×0.3)"));
        assert!(section.contains("EMERG → META_METAPHOR:"));
    }

    #[test]
    fn section_lands_before_marker() {
        let base = format!("Классы...\n\n{}\n{{}}", RESPONSE_FORMAT_MARKER);
        let enhanced = enhance_system_prompt(&base, "СЕКЦИЯ");
        let section_at = enhanced.find("СЕКЦИЯ").unwrap();
        let marker_at = enhanced.find(RESPONSE_FORMAT_MARKER).unwrap();
        assert!(section_at < marker_at);
        assert!(enhanced.starts_with("Классы..."));
    }

    #[test]
    fn prompt_without_marker_is_unchanged() {
        assert_eq!(enhance_system_prompt("no marker here", "СЕКЦИЯ"), "no marker here");
    }
}
