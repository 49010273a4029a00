//! Built-in lexicon tables.
//!
//! These are product-policy placeholders pending clinical review. Deployments
//! are expected to ship their own lexicon file via `lexicon_path`.

use super::{CopingEntry, LexiconData, PatternEntry, PatternKind, Severity, TemplateEntry};

/// Version tag of the built-in tables.
pub const BUILTIN_VERSION: &str = "builtin-3";

// ── Crisis patterns ─────────────────────────────────────────────────────

/// (id, pattern, kind, severity, display text)
const PATTERNS: &[(&str, &str, PatternKind, Severity, &str)] = &[
    // Imminent: any un-negated hit raises the crisis tier.
    ("imminent.suicide", "suicide", PatternKind::Phrase, Severity::Imminent, "mentions suicide"),
    (
        "imminent.suicidal",
        "suicidal",
        PatternKind::Phrase,
        Severity::Imminent,
        "describes feeling suicidal",
    ),
    (
        "imminent.kill_myself",
        "kill myself",
        PatternKind::Phrase,
        Severity::Imminent,
        "intent to kill oneself",
    ),
    (
        "imminent.end_my_life",
        "end my life",
        PatternKind::Phrase,
        Severity::Imminent,
        "intent to end one's life",
    ),
    (
        "imminent.take_my_life",
        "take my own life",
        PatternKind::Phrase,
        Severity::Imminent,
        "intent to end one's life",
    ),
    ("imminent.want_to_die", "want to die", PatternKind::Phrase, Severity::Imminent, "wish to die"),
    ("imminent.wanna_die", "wanna die", PatternKind::Phrase, Severity::Imminent, "wish to die"),
    (
        "imminent.better_off_dead",
        "better off dead",
        PatternKind::Phrase,
        Severity::Imminent,
        "belief of being better off dead",
    ),
    (
        "imminent.self_harm",
        "self harm",
        PatternKind::Phrase,
        Severity::Imminent,
        "mentions self-harm",
    ),
    (
        "imminent.cut_myself",
        "cut myself",
        PatternKind::Phrase,
        Severity::Imminent,
        "mentions cutting",
    ),
    (
        "imminent.hurt_myself",
        "hurt myself",
        PatternKind::Phrase,
        Severity::Imminent,
        "intent to self-injure",
    ),
    (
        "imminent.no_reason_to_live",
        "no reason to live",
        PatternKind::Phrase,
        Severity::Imminent,
        "no reason to live",
    ),
    (
        "imminent.give_up_on_life",
        "give up on life",
        PatternKind::Phrase,
        Severity::Imminent,
        "giving up on life",
    ),
    (
        "imminent.dont_want_to_live",
        "dont want to live",
        PatternKind::Phrase,
        Severity::Imminent,
        "not wanting to live",
    ),
    (
        "imminent.dont_want_to_be_alive",
        "dont want to be alive",
        PatternKind::Phrase,
        Severity::Imminent,
        "not wanting to be alive",
    ),
    (
        "imminent.end_it_all",
        r"\bend(ing)? (it|things) (all|tonight|now)\b",
        PatternKind::Regex,
        Severity::Imminent,
        "intent to end things",
    ),
    (
        "imminent.overdose",
        r"\b(overdose|od) on\b",
        PatternKind::Regex,
        Severity::Imminent,
        "mentions overdosing",
    ),
    // Elevated: serious distress without explicit intent.
    ("elevated.cant_go_on", "cant go on", PatternKind::Phrase, Severity::Elevated, "cannot go on"),
    (
        "elevated.cant_take_it",
        "cant take it anymore",
        PatternKind::Phrase,
        Severity::Elevated,
        "cannot take it anymore",
    ),
    (
        "elevated.cant_do_this",
        "cant do this anymore",
        PatternKind::Phrase,
        Severity::Elevated,
        "cannot do this anymore",
    ),
    (
        "elevated.no_way_out",
        "no way out",
        PatternKind::Phrase,
        Severity::Elevated,
        "feeling trapped",
    ),
    ("elevated.trapped", "trapped", PatternKind::Phrase, Severity::Elevated, "feeling trapped"),
    (
        "elevated.burden",
        r"\b(a|such a) burden\b",
        PatternKind::Regex,
        Severity::Elevated,
        "feeling like a burden",
    ),
    (
        "elevated.better_off_without_me",
        "better off without me",
        PatternKind::Phrase,
        Severity::Elevated,
        "belief others are better off without them",
    ),
    (
        "elevated.nobody_would_care",
        "nobody would care",
        PatternKind::Phrase,
        Severity::Elevated,
        "belief nobody would care",
    ),
    ("elevated.hate_myself", "hate myself", PatternKind::Phrase, Severity::Elevated, "self-hatred"),
    (
        "elevated.disappear",
        "want to disappear",
        PatternKind::Phrase,
        Severity::Elevated,
        "wish to disappear",
    ),
    // Informational: mild signals that only count when sustained across turns.
    ("info.hopeless", "hopeless", PatternKind::Phrase, Severity::Informational, "hopelessness"),
    ("info.worthless", "worthless", PatternKind::Phrase, Severity::Informational, "worthlessness"),
    (
        "info.nothing_worth_it",
        r"\bnothing (feels|seems|is) worth\b",
        PatternKind::Regex,
        Severity::Informational,
        "nothing feels worthwhile",
    ),
    (
        "info.nothing_matters",
        "nothing matters",
        PatternKind::Phrase,
        Severity::Informational,
        "nothing matters",
    ),
    (
        "info.whats_the_point",
        "whats the point",
        PatternKind::Phrase,
        Severity::Informational,
        "questioning the point",
    ),
    (
        "info.pointless",
        "pointless",
        PatternKind::Phrase,
        Severity::Informational,
        "feeling of pointlessness",
    ),
    (
        "info.empty_inside",
        "empty inside",
        PatternKind::Phrase,
        Severity::Informational,
        "feeling empty",
    ),
    ("info.numb", "numb", PatternKind::Phrase, Severity::Informational, "emotional numbness"),
    ("info.so_alone", "so alone", PatternKind::Phrase, Severity::Informational, "loneliness"),
    (
        "info.give_up",
        r"\bgiv(e|ing) up\b",
        PatternKind::Regex,
        Severity::Informational,
        "giving up",
    ),
    (
        "info.cant_cope",
        "cant cope",
        PatternKind::Phrase,
        Severity::Informational,
        "struggling to cope",
    ),
];

// ── Coping strategies ───────────────────────────────────────────────────

/// (id, category, text)
const COPING: &[(&str, &str, &str)] = &[
    (
        "sad.reach_out",
        "sad",
        "It might help to send a short message to someone you trust, even just to say hi.",
    ),
    (
        "sad.small_kindness",
        "sad",
        "Try doing one small, kind thing for yourself today, like a warm drink or a favourite song.",
    ),
    (
        "sad.journal",
        "sad",
        "Writing down a few sentences about how you feel can make it a little lighter to carry.",
    ),
    (
        "anxious.box_breathing",
        "anxious",
        "Try box breathing: in for 4, hold for 4, out for 4, hold for 4. Repeat a few times.",
    ),
    (
        "anxious.grounding",
        "anxious",
        "Try the 5-4-3-2-1 exercise: name 5 things you see, 4 you can touch, 3 you hear, 2 you smell and 1 you taste.",
    ),
    (
        "stressed.one_step",
        "stressed",
        "Pick just one small task and set everything else aside for the next ten minutes.",
    ),
    (
        "stressed.break",
        "stressed",
        "A short break away from screens, even five minutes, can help your mind reset.",
    ),
    (
        "general.walk",
        "general",
        "A short walk or a bit of fresh air can sometimes shift how things feel.",
    ),
    ("general.water", "general", "Have a glass of water and notice how your body feels right now."),
    (
        "general.gratitude",
        "general",
        "Try naming one small thing that went okay today, however minor.",
    ),
];

// ── Reply templates ─────────────────────────────────────────────────────

/// (id, family, text)
const TEMPLATES: &[(&str, &str, &str)] = &[
    (
        "reply.very_negative.1",
        "reply.very_negative",
        "That sounds really painful, and I'm glad you told me. You don't have to carry this on your own.",
    ),
    (
        "reply.very_negative.2",
        "reply.very_negative",
        "It sounds like things are very hard right now. Feeling like this is completely valid.",
    ),
    ("reply.negative.1", "reply.negative", "It sounds like you're going through something tough."),
    ("reply.negative.2", "reply.negative", "That does sound really heavy to carry on your own."),
    ("reply.negative.3", "reply.negative", "It seems like things have been pretty hard lately."),
    ("reply.neutral.1", "reply.neutral", "I hear you. Thanks for explaining what's going on."),
    ("reply.neutral.2", "reply.neutral", "Thanks for sharing that with me."),
    (
        "reply.neutral.3",
        "reply.neutral",
        "Got it. From what you said, it feels like: \u{201c}{excerpt}\u{201d}.",
    ),
    (
        "reply.positive.1",
        "reply.positive",
        "It sounds like there are some hopeful things happening for you.",
    ),
    (
        "reply.positive.2",
        "reply.positive",
        "I'm happy to hear there's some positivity in how you're feeling.",
    ),
    (
        "reply.positive.3",
        "reply.positive",
        "It seems like you're noticing some good things in your life.",
    ),
    (
        "reply.very_positive.1",
        "reply.very_positive",
        "That's wonderful to hear! What would you like to keep building on from these feelings?",
    ),
    (
        "reply.very_positive.2",
        "reply.very_positive",
        "I'm really glad things feel this good right now.",
    ),
    (
        "acknowledge.very_negative.1",
        "acknowledge.very_negative",
        "I'm really sorry you're feeling this way. What you're describing sounds overwhelming, and it matters.",
    ),
    (
        "acknowledge.negative.1",
        "acknowledge.negative",
        "Thank you for trusting me with this. It sounds like you've been carrying a lot.",
    ),
    (
        "acknowledge.negative.2",
        "acknowledge.negative",
        "That sounds exhausting. You're not alone in feeling this way, even if it might feel like it.",
    ),
    (
        "acknowledge.neutral.1",
        "acknowledge.neutral",
        "I want to check in, because some of what you said sounds heavy. How are you holding up?",
    ),
    (
        "acknowledge.positive.1",
        "acknowledge.positive",
        "I'm glad some things feel okay, and I also heard something heavier in what you said.",
    ),
    (
        "acknowledge.very_positive.1",
        "acknowledge.very_positive",
        "I'm glad there's good in your day, and I want to make sure you're alright with the harder part too.",
    ),
    (
        "follow_up.1",
        "follow_up",
        "If you feel okay sharing, what's the part that feels hardest right now?",
    ),
    ("follow_up.2", "follow_up", "What part of this would you like to talk about a bit more?"),
    ("clarify.1", "clarify", "I'm here and listening. Whenever you're ready, what's on your mind?"),
];

impl LexiconData {
    /// The built-in tables as lexicon data.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: BUILTIN_VERSION.to_owned(),
            patterns: PATTERNS
                .iter()
                .map(|&(id, pattern, kind, severity, text)| PatternEntry {
                    id: id.to_owned(),
                    pattern: pattern.to_owned(),
                    kind,
                    severity,
                    display_text: text.to_owned(),
                })
                .collect(),
            coping: COPING
                .iter()
                .map(|&(id, category, text)| CopingEntry {
                    id: id.to_owned(),
                    category: category.to_owned(),
                    display_text: text.to_owned(),
                })
                .collect(),
            templates: TEMPLATES
                .iter()
                .map(|&(id, family, text)| TemplateEntry {
                    id: id.to_owned(),
                    family: family.to_owned(),
                    display_text: text.to_owned(),
                })
                .collect(),
        }
    }
}
