//! Clinical signal vocabularies used by the classifier and the fallback
//! engine. Phrases align with NICE ACS/chest-pain and valve red-flag
//! concepts; none of this replaces clinical judgement.

use std::sync::LazyLock;

use regex::Regex;

/// Phrases indicating a clinically urgent condition. Weight 3.0 each,
/// counted once per distinct phrase.
pub static RED_FLAGS: &[&str] = &[
    // Ischaemia / ACS
    "ongoing chest pain",
    "at rest chest pain",
    "ischaemic chest pain",
    "ischemic chest pain",
    "sweating with chest pain",
    "diaphoresis",
    "radiation to arm or jaw",
    // Haemodynamic compromise
    "hypotension",
    "shock",
    "haemodynamic instability",
    "hemodynamic instability",
    // Arrhythmia / syncope
    "sustained ventricular tachycardia",
    "vf arrest",
    "vt arrest",
    "complete heart block",
    "syncope on exertion",
    "collapse during exercise",
    // Aortic syndrome
    "tearing chest pain",
    "back migrating chest pain",
    "pulse deficit",
    // Acute heart failure
    "pulmonary oedema",
    "acute heart failure",
    "oxygen saturation <90%",
    // Valve red flags
    "exertional syncope",
    "syncope with murmur",
    "severe aortic stenosis",
];

/// Phrases suggesting surgical-team involvement. Weight 1.0 each, same
/// dedup rule as red flags.
pub static SURGICAL_INDICATORS: &[&str] = &[
    "severe valvular disease",
    "aortic stenosis",
    "mitral regurgitation",
    "coronary artery disease",
    "triple vessel disease",
    "left main stem stenosis",
    "ventricular septal defect",
    "aortic aneurysm",
    "cardiac transplant",
    "lvef <30%",
    "ejection fraction <30",
    "refractory heart failure",
];

/// Explicit emergency phrasing. Each pattern that matches at least once
/// adds a flat 5.0 to the score; matches are not listed as named signals.
pub static EMERGENCY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(stemi|ongoing ischemia|cardiogenic shock|vf arrest|vt storm)\b",
        r"(?i)\b(aortic dissection|type a dissection)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid emergency pattern"))
    .collect()
});

/// A fallback-engine signal group: any contained phrase (case-insensitive
/// substring) raises the named signal.
pub struct SignalGroup {
    pub phrases: &'static [&'static str],
    pub label: &'static str,
}

pub static SURGICAL_REFERRAL: SignalGroup = SignalGroup {
    phrases: &["urgent surgical referral", "urgent cardiothoracic referral"],
    label: "urgent surgical referral mentioned",
};

pub static SYNCOPE: SignalGroup = SignalGroup {
    phrases: &["syncope", "presyncope", "blackout", "collapse"],
    label: "syncope/presyncope",
};

pub static REST_PAIN: SignalGroup = SignalGroup {
    phrases: &["ongoing chest pain", "rest pain", "pain at rest"],
    label: "ongoing/rest chest pain",
};

pub static ACS: SignalGroup = SignalGroup {
    phrases: &[
        "stemi",
        "nstemi",
        "raised troponin",
        "elevated troponin",
        "myocardial infarction",
    ],
    label: "possible ACS",
};

pub static SEVERE_AS: SignalGroup = SignalGroup {
    phrases: &["severe aortic stenosis", "critical aortic stenosis"],
    label: "possible severe aortic stenosis",
};

pub static HAEMODYNAMIC: SignalGroup = SignalGroup {
    phrases: &["haemodynamic instability", "hypotension", "shock"],
    label: "haemodynamic concern",
};

pub static ENDOCARDITIS: SignalGroup = SignalGroup {
    phrases: &["infective endocarditis", "endocarditis", "vegetation"],
    label: "suspected endocarditis",
};

pub static DISSECTION: SignalGroup = SignalGroup {
    phrases: &["aortic dissection", "tearing chest pain", "mediastinal widening"],
    label: "suspected aortic dissection",
};

/// All fallback groups, in detection order.
pub static FALLBACK_GROUPS: &[&SignalGroup] = &[
    &SURGICAL_REFERRAL,
    &SYNCOPE,
    &REST_PAIN,
    &ACS,
    &SEVERE_AS,
    &HAEMODYNAMIC,
    &ENDOCARDITIS,
    &DISSECTION,
];
