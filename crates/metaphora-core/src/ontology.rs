//! Metaphor ontology for consciousness theories.
//!
//! Maps each substantive theory to three ordered phrase lists:
//! - `keywords`: explicit theoretical vocabulary,
//! - `scientific_metaphors`: metaphors used inside scientific discourse,
//! - `artistic_transformations`: artistic reinterpretations of those metaphors.
//!
//! The vocabulary is bilingual (Russian/English) because the corpus it was built for is.
//! An [`Ontology`] is an ordinary immutable value: the analyzer receives one at
//! construction, so tests and callers can inject their own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{OntologyError, Theory};

/// Lexical profile of a single theory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEntry {
    pub theory: Theory,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub scientific_metaphors: Vec<String>,
    #[serde(default)]
    pub artistic_transformations: Vec<String>,
}

impl DomainEntry {
    pub fn new(
        theory: Theory,
        keywords: &[&str],
        scientific_metaphors: &[&str],
        artistic_transformations: &[&str],
    ) -> Self {
        Self {
            theory,
            keywords: owned(keywords),
            scientific_metaphors: owned(scientific_metaphors),
            artistic_transformations: owned(artistic_transformations),
        }
    }
}

/// Marker vocabularies used to decide a metaphor's [`MetaphorType`](crate::MetaphorType).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMarkers {
    /// Checked against the whole text.
    pub ontological: Vec<String>,
    /// Checked against the matched span only.
    pub structural: Vec<String>,
    /// Checked against the matched span only.
    pub orientational: Vec<String>,
}

impl Default for TypeMarkers {
    fn default() -> Self {
        Self {
            ontological: owned(&[
                "сознание", "разум", "мышление", "познание", "опыт",
                "consciousness", "mind", "thinking", "cognition", "experience",
                "субъективность", "квалиа", "осознание", "awareness",
                "природа", "сущность", "механизм", "nature", "essence",
            ]),
            structural: owned(&[
                "архитектура", "структура", "слои", "уровни", "модули",
                "architecture", "structure", "layers", "levels", "modules",
                "организация", "иерархия", "система", "organization",
            ]),
            orientational: owned(&[
                "внутри", "снаружи", "верх", "низ", "глубина", "поверхность",
                "inside", "outside", "up", "down", "depth", "surface",
                "центр", "периферия", "пространство", "время",
            ]),
        }
    }
}

/// Validated, immutable theory ontology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ontology {
    domains: Vec<DomainEntry>,
    markers: TypeMarkers,
}

/// On-disk shape; markers fall back to the built-in vocabulary.
#[derive(Deserialize)]
struct OntologyFile {
    domains: Vec<DomainEntry>,
    #[serde(default)]
    markers: Option<TypeMarkers>,
}

impl Ontology {
    /// Build and validate an ontology. Domain order is preserved and becomes the
    /// iteration order for scoring and tie-breaks.
    pub fn new(domains: Vec<DomainEntry>, markers: TypeMarkers) -> Result<Self, OntologyError> {
        let mut seen = BTreeSet::new();
        for entry in &domains {
            if !entry.theory.is_substantive() {
                return Err(OntologyError::UndeterminedDomain(entry.theory));
            }
            if !seen.insert(entry.theory) {
                return Err(OntologyError::DuplicateTheory(entry.theory));
            }
            for (list, phrases) in [
                ("keywords", &entry.keywords),
                ("scientific_metaphors", &entry.scientific_metaphors),
                ("artistic_transformations", &entry.artistic_transformations),
            ] {
                if phrases.iter().any(|p| p.trim().is_empty()) {
                    return Err(OntologyError::BlankPhrase {
                        theory: entry.theory,
                        list,
                    });
                }
            }
        }
        for (name, list) in [
            ("ontological", &markers.ontological),
            ("structural", &markers.structural),
            ("orientational", &markers.orientational),
        ] {
            if list.iter().any(|m| m.trim().is_empty()) {
                return Err(OntologyError::BlankMarker(name));
            }
        }
        Ok(Self { domains, markers })
    }

    /// The compiled-in ontology covering all seven substantive theories.
    pub fn builtin() -> Self {
        Self {
            domains: builtin_domains(),
            markers: TypeMarkers::default(),
        }
    }

    /// Parse `{"domains": [...], "markers": {...}}`; `markers` is optional.
    pub fn from_json(json: &str) -> Result<Self, OntologyError> {
        let file: OntologyFile = serde_json::from_str(json)?;
        Self::new(file.domains, file.markers.unwrap_or_default())
    }

    pub fn to_json_pretty(&self) -> Result<String, OntologyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All domains in ontology order.
    pub fn domains(&self) -> &[DomainEntry] {
        &self.domains
    }

    pub fn domain(&self, theory: Theory) -> Option<&DomainEntry> {
        self.domains.iter().find(|d| d.theory == theory)
    }

    pub fn markers(&self) -> &TypeMarkers {
        &self.markers
    }
}

impl Default for Ontology {
    fn default() -> Self {
        Self::builtin()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn builtin_domains() -> Vec<DomainEntry> {
    vec![
        // Computational / functional
        DomainEntry::new(
            Theory::Comp,
            &[
                "алгоритм", "вычисление", "процессор", "программа", "код",
                "input", "output", "обработка", "computation", "function",
                "символ", "репрезентация", "информация",
            ],
            &[
                "мозг как компьютер",
                "сознание как программное обеспечение",
                "разум как машина Тьюринга",
                "мышление как вычисление",
            ],
            &[
                "данные как материал",
                "алгоритм как художник",
                "код как язык искусства",
                "нейросеть как сознание",
            ],
        ),
        // Integrated information
        DomainEntry::new(
            Theory::Iit,
            &[
                "интеграция", "целостность", "несводимость", "phi", "квалиа",
                "integration", "irreducibility", "quale", "субъективность",
                "внутренняя перспектива", "феноменальное",
            ],
            &[
                "сознание как интегрированная информация",
                "опыт как неделимое целое",
                "phi как мера сознания",
            ],
            &[
                "единство противоположностей",
                "неделимый образ",
                "целое больше суммы частей",
                "интегрированное восприятие",
            ],
        ),
        // Predictive processing
        DomainEntry::new(
            Theory::Pred,
            &[
                "предсказание", "прогноз", "ошибка", "байесовский", "prior",
                "prediction", "error", "bayesian", "free energy", "минимизация",
                "неопределённость", "вероятность", "модель мира",
            ],
            &[
                "мозг как байесовский предсказатель",
                "сознание как минимизация свободной энергии",
                "восприятие как контролируемая галлюцинация",
            ],
            &[
                "ожидание vs реальность",
                "генеративные модели как творчество",
                "предвосхищение образа",
                "синтез восприятия",
            ],
        ),
        // Global workspace
        DomainEntry::new(
            Theory::Gwt,
            &[
                "внимание", "рабочее пространство", "broadcast", "театр",
                "spotlight", "awareness", "доступ", "глобальный",
                "конкуренция", "селекция", "фокус",
            ],
            &[
                "сознание как театр разума",
                "внимание как прожектор",
                "осознание как трансляция информации",
            ],
            &[
                "сцена восприятия",
                "фокус внимания",
                "выбор образа",
                "освещение смысла",
            ],
        ),
        // Enactivism
        DomainEntry::new(
            Theory::Enact,
            &[
                "телесность", "воплощение", "действие", "сенсомоторный",
                "embodied", "enacted", "sensorimotor", "петля",
                "взаимодействие", "среда", "coupling", "движение",
            ],
            &[
                "познание как действие",
                "разум как воплощённый процесс",
                "сознание через телесность",
            ],
            &[
                "тело как медиум",
                "жест как мысль",
                "движение как познание",
                "материальность разума",
            ],
        ),
        // Panpsychism
        DomainEntry::new(
            Theory::Pan,
            &[
                "протоопыт", "панпсихизм", "одушевление", "всеобщность",
                "protophenomenal", "panpsychism", "универсальность",
                "материя чувствует", "внутренняя жизнь", "анимизм",
            ],
            &[
                "материя как чувствующая",
                "протоквалиа в элементах",
                "сознание как фундаментальное свойство",
            ],
            &[
                "живая материя",
                "одушевлённые объекты",
                "чувствующие системы",
                "агентность материала",
            ],
        ),
        // Emergentism
        DomainEntry::new(
            Theory::Emerg,
            &[
                "эмерджентность", "самоорганизация", "сложность", "рой",
                "emergence", "self-organization", "swarm", "collective",
                "фазовый переход", "новое качество", "синергия",
            ],
            &[
                "сознание как эмерджентное свойство",
                "разум как самоорганизующаяся система",
                "коллективный интеллект",
            ],
            &[
                "роевой разум",
                "коллективное творчество",
                "спонтанный порядок",
                "множественность в единстве",
            ],
        ),
    ]
}
