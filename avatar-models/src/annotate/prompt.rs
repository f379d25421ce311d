//! Instruction prompt for emotion annotation.

use std::fmt;

/// Facial expression markers the avatar understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionTag {
    Happy,
    Sad,
    Anger,
    Surprise,
    Wink,
    Serious,
    Joke,
    Cry,
}

impl EmotionTag {
    pub const ALL: [EmotionTag; 8] = [
        Self::Happy,
        Self::Sad,
        Self::Anger,
        Self::Surprise,
        Self::Wink,
        Self::Serious,
        Self::Joke,
        Self::Cry,
    ];

    /// Marker text as it appears in annotated output, e.g. `(feliz)`.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Happy => "(feliz)",
            Self::Sad => "(triste)",
            Self::Anger => "(enojo)",
            Self::Surprise => "(sorpresa)",
            Self::Wink => "(guiño)",
            Self::Serious => "(serio)",
            Self::Joke => "(broma)",
            Self::Cry => "(llorar)",
        }
    }

    /// When the marker applies.
    fn cue(&self) -> &'static str {
        match self {
            Self::Happy => "alegría, entusiasmo, celebración",
            Self::Sad => "pena, nostalgia, dolor emocional",
            Self::Anger => "molestia, frustración, indignación",
            Self::Surprise => "asombro, noticia inesperada",
            Self::Wink => "complicidad, secreto, coqueteo",
            Self::Serious => "advertencia, énfasis, momento importante",
            Self::Joke => "humor, sarcasmo, tono juguetón",
            Self::Cry => "llanto, emoción muy profunda",
        }
    }
}

impl fmt::Display for EmotionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Build the director prompt for `text`.
pub fn build_prompt(text: &str) -> String {
    let mut prompt = String::from(
        "Actúas como director de actuación de un avatar 3D que habla español.\n\
         Tu único trabajo es marcar dónde cambia la expresión facial del avatar.\n\n\
         MARCAS PERMITIDAS (escríbelas tal cual, con paréntesis):\n",
    );

    for tag in EmotionTag::ALL {
        prompt.push_str(&format!("{:<11} {}\n", tag.marker(), tag.cue()));
    }

    prompt.push_str(
        "\nREGLAS:\n\
         1. Coloca la marca justo ANTES de la oración o frase que la necesita\n\
         2. Como máximo una marca cada 2-3 oraciones\n\
         3. Si el texto es neutral o informativo, no uses marcas\n\
         4. No cambies, quites ni agregues ninguna palabra del texto\n\
         5. Responde solo con el texto marcado, sin comillas ni comentarios\n\n\
         Texto:\n",
    );
    prompt.push_str(text);
    prompt
}
