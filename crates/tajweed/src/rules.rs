/// One entry of the tajweed rule table.
///
/// `css_class` is the identifier carried by the Quran.Foundation
/// `uthmani_tajweed` markup; `color` is the hex color the reader UI renders
/// the annotated run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TajweedRule {
    pub id: &'static str,
    pub css_class: &'static str,
    pub name: &'static str,
    pub name_arabic: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

const RULES: [TajweedRule; 17] = [
    TajweedRule {
        id: "ghunnah",
        css_class: "tajweed_ghunnah",
        name: "Ghunnah",
        name_arabic: "غنة",
        color: "#FF7F50",
        description: "Nasal sound held for 2 counts",
    },
    TajweedRule {
        id: "ikhfa",
        css_class: "tajweed_ikhfa",
        name: "Ikhfa",
        name_arabic: "إخفاء",
        color: "#D2691E",
        description: "Hidden/concealed pronunciation",
    },
    TajweedRule {
        id: "idgham_ghunnah",
        css_class: "tajweed_idghaam_ghunnah",
        name: "Idgham with Ghunnah",
        name_arabic: "إدغام بغنة",
        color: "#9370DB",
        description: "Merging with nasal sound",
    },
    TajweedRule {
        id: "idgham_no_ghunnah",
        css_class: "tajweed_idghaam_no_ghunnah",
        name: "Idgham without Ghunnah",
        name_arabic: "إدغام بلا غنة",
        color: "#BA55D3",
        description: "Merging without nasal sound",
    },
    TajweedRule {
        id: "iqlab",
        css_class: "tajweed_iqlab",
        name: "Iqlab",
        name_arabic: "إقلاب",
        color: "#3CB371",
        description: "Converting noon sakinah to meem",
    },
    TajweedRule {
        id: "qalqalah",
        css_class: "tajweed_qalqalah",
        name: "Qalqalah",
        name_arabic: "قلقلة",
        color: "#4169E1",
        description: "Echoing/bouncing sound on specific letters",
    },
    TajweedRule {
        id: "madd_normal",
        css_class: "tajweed_madd_normal",
        name: "Madd (Normal)",
        name_arabic: "مد طبيعي",
        color: "#FF6347",
        description: "Natural elongation of 2 counts",
    },
    TajweedRule {
        id: "madd_permissible",
        css_class: "tajweed_madd_permissible",
        name: "Madd (Permissible)",
        name_arabic: "مد جائز",
        color: "#FF4500",
        description: "Permissible elongation of 2-6 counts",
    },
    TajweedRule {
        id: "madd_obligatory",
        css_class: "tajweed_madd_obligatory",
        name: "Madd (Obligatory)",
        name_arabic: "مد لازم",
        color: "#DC143C",
        description: "Obligatory elongation of 6 counts",
    },
    TajweedRule {
        id: "madd_munfasil",
        css_class: "tajweed_madd_munfasil",
        name: "Madd Munfasil",
        name_arabic: "مد منفصل",
        color: "#CD5C5C",
        description: "Separated elongation",
    },
    TajweedRule {
        id: "madd_muttasil",
        css_class: "tajweed_madd_muttasil",
        name: "Madd Muttasil",
        name_arabic: "مد متصل",
        color: "#B22222",
        description: "Connected elongation",
    },
    TajweedRule {
        id: "lam_shamsiyyah",
        css_class: "tajweed_laam_shamsiyyah",
        name: "Lam Shamsiyyah",
        name_arabic: "لام شمسية",
        color: "#FFD700",
        description: "Solar lam - assimilated into following letter",
    },
    TajweedRule {
        id: "ikhfa_shafawi",
        css_class: "tajweed_ikhfa_shafawi",
        name: "Ikhfa Shafawi",
        name_arabic: "إخفاء شفوي",
        color: "#DAA520",
        description: "Lip-based concealment",
    },
    TajweedRule {
        id: "idgham_shafawi",
        css_class: "tajweed_idghaam_shafawi",
        name: "Idgham Shafawi",
        name_arabic: "إدغام شفوي",
        color: "#8B4513",
        description: "Lip-based merging of meem",
    },
    TajweedRule {
        id: "silent",
        css_class: "tajweed_silent",
        name: "Silent",
        name_arabic: "حرف ساكن",
        color: "#808080",
        description: "Silent letter - not pronounced",
    },
    TajweedRule {
        id: "idhhar",
        css_class: "tajweed_idhaar",
        name: "Idhhar",
        name_arabic: "إظهار",
        color: "#20B2AA",
        description: "Clear pronunciation without nasalization",
    },
    TajweedRule {
        id: "idhhar_shafawi",
        css_class: "tajweed_idhaar_shafawi",
        name: "Idhhar Shafawi",
        name_arabic: "إظهار شفوي",
        color: "#48D1CC",
        description: "Lip-based clear pronunciation",
    },
];

/// The full rule table, in display order.
pub fn rules() -> &'static [TajweedRule] {
    &RULES
}

/// Look up a rule by the CSS class token found in verse markup.
pub fn rule_by_class(css_class: &str) -> Option<&'static TajweedRule> {
    RULES.iter().find(|rule| rule.css_class == css_class)
}

/// Look up a rule by its stable identifier.
pub fn rule_by_id(id: &str) -> Option<&'static TajweedRule> {
    RULES.iter().find(|rule| rule.id == id)
}
