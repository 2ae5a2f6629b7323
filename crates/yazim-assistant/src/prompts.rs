//! Instruction and prompt text sent to the AI service.
//!
//! The service is always addressed in Turkish except for the translator
//! personas. User text is embedded verbatim inside double quotes.

use yazim_core::types::{EnhancementLevel, GroundingDocument, ModelTier};

use crate::TranslationDirection;

const GRAMMAR_PERSONA: &str = "Sen 'Yazım Doktoru' adında, Türk Dil Kurumu (TDK) kurallarına hakim, \
uzman bir Türkçe dil bilimcisin. Görevin, verilen metni analiz edip yazım, imla ve noktalama \
hatalarını bulmak, her hatanın başlangıç ve bitiş indekslerini belirlemek, puanlamak, geri \
bildirim sağlamak ve metnin tamamen düzeltilmiş bir versiyonunu oluşturmaktır.";

const JSON_ONLY: &str = "\n\nCevabını sadece istenen JSON formatında ver.";

const PROMPT_ENGINEER_PERSONA: &str = "Sen uzman bir 'Prompt Mühendisi'sin. Görevin, kullanıcı \
tarafından sağlanan taslak bir prompt'u analiz etmek ve kullanıcının asıl niyetini (muradını) \
anlamaktır. Bu niyeti temel alarak, prompt'u başka bir yapay zeka modeli için daha etkili hale \
getir. Kullanıcının prompt'unu yanıtlama, sadece prompt'un kendisini geliştir. Cevap olarak \
SADECE geliştirilmiş ve tamamlanmış prompt metnini Türkçe olarak ver.";

pub const TRANSLATION_TEMPERATURE: f32 = 0.2;
pub const DETECTION_TEMPERATURE: f32 = 0.0;

/// Render grounding documents as named blocks separated by blank lines.
pub fn document_blocks(documents: &[GroundingDocument]) -> String {
    documents
        .iter()
        .map(|doc| format!("--- Döküman: {} ---\n{}", doc.name, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn grammar_system_instruction(
    context: Option<&str>,
    documents: &[GroundingDocument],
) -> String {
    let mut instruction = GRAMMAR_PERSONA.to_string();

    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        instruction.push_str(&format!(
            " Analizini yaparken şu kullanıcı bağlamını ve özel kuralları dikkate al: '{}'. \
             Bu kurallara uyan durumları hata olarak işaretleme.",
            context
        ));
    }

    if !documents.is_empty() {
        instruction.push_str(
            "\n\nAyrıca, analizini yaparken aşağıdaki dökümanları BİRİNCİL ve TEK doğruluk \
             kaynağı olarak kullan. Bu dökümanlardaki kurallar, TDK kuralları da dahil olmak \
             üzere diğer tüm genel bilgilerinden daha önceliklidir. İşte dökümanların içeriği:\n\n",
        );
        instruction.push_str(&document_blocks(documents));
    }

    instruction.push_str(JSON_ONLY);
    instruction
}

pub fn grammar_user_prompt(text: &str) -> String {
    format!(
        "Lütfen aşağıdaki metni Türkçe imla, yazım ve noktalama kurallarına göre analiz et ve \
         JSON formatında bir değerlendirme sun. Metin: \"{}\"",
        text
    )
}

pub fn translation_system_instruction(direction: TranslationDirection) -> &'static str {
    match direction {
        TranslationDirection::TurkishToEnglish => {
            "You are an expert Turkish-to-English translator. Your sole task is to provide a \
             high-fidelity translation of the given text, preserving its original meaning, tone, \
             and any nuances. Provide ONLY the translated English text as your response."
        }
        TranslationDirection::EnglishToTurkish => {
            "You are an expert English-to-Turkish translator. Your sole task is to provide a \
             high-fidelity translation of the given text, preserving its original meaning, tone, \
             and any nuances. Provide ONLY the translated Turkish text as your response."
        }
    }
}

pub fn translation_user_prompt(text: &str, direction: TranslationDirection) -> String {
    match direction {
        TranslationDirection::TurkishToEnglish => format!(
            "Lütfen aşağıdaki Türkçe metni İngilizce'ye çevir. Metin: \"{}\"",
            text
        ),
        TranslationDirection::EnglishToTurkish => format!(
            "Lütfen aşağıdaki İngilizce metni Türkçe'ye çevir. Metin: \"{}\"",
            text
        ),
    }
}

pub fn language_detection_prompt(text: &str) -> String {
    format!(
        "Lütfen aşağıdaki metnin dilini belirle. Sadece 'tr' (Türkçe için) veya 'en' (İngilizce \
         için) olarak yanıt ver. Başka hiçbir açıklama ekleme. Metin: \"{}\"",
        text
    )
}

/// Instruction for prompt enhancement at `level`, optionally forcing a
/// role/context/task framing.
pub fn enhancement_system_instruction(level: EnhancementLevel, force_role_context: bool) -> String {
    let mut instruction = PROMPT_ENGINEER_PERSONA.to_string();
    let value = level.value();

    if force_role_context {
        instruction.push_str(
            "\n\nKullanıcının isteği ne olursa olsun, prompt'a MUTLAKA net bir ROL, detaylı bir \
             BAĞLAM ve belirli bir GÖREV ekleyerek onu zenginleştir.",
        );
    }

    if value == 0 {
        if !force_role_context {
            instruction.push_str(
                "\n\nPrompt'un karmaşıklığını analiz et. Eğer karmaşık ve fayda sağlayacaksa, net \
                 bir ROL, BAĞLAM ve GÖREV ekleyerek zenginleştir. Eğer basitse, sadece daha \
                 anlaşılır kılacak küçük iyileştirmeler yap, gereksiz yere rol ve bağlam ekleme. \
                 Amacın her zaman prompt'un kalitesini duruma uygun şekilde artırmaktır.",
            );
        }
    } else if value > 0 {
        instruction.push_str(&format!(
            "\n\nPrompt'u, geliştirme yoğunluğu ve detay seviyesi pozitif yönde (+1 ile +30 \
             arasında), yaklaşık olarak +{} seviyesinde olacak şekilde daha kapsamlı ve detaylı \
             hale getir. +30, mümkün olan en kapsamlı ve detaylı versiyonu ifade eder.",
            value
        ));
        if !force_role_context {
            instruction.push_str(
                " Kullanıcı rol ve bağlam eklenmesini zorunlu kılmadığı için, bu yapıyı sadece \
                 gerçekten gerekli olduğunda kullan.",
            );
        }
    } else {
        instruction.push_str(&format!(
            "\n\nPrompt'u, basitleştirme yoğunluğu negatif yönde (-1 ile -20 arasında), yaklaşık \
             olarak {} seviyesinde olacak şekilde daha kısa, açık ve net bir hale getir. -20, \
             mümkün olan en kısa ve özet versiyonu ifade eder. Karmaşık ve gereksiz detayları \
             çıkar.",
            value
        ));
        if force_role_context {
            instruction.push_str(
                " Bu basitleştirme işlemine rağmen, prompt'un ROL ve BAĞLAM yapısını koru, ancak \
                 bu bölümleri de olabildiğince kısa ve öz tut.",
            );
        }
    }

    instruction
}

pub fn enhancement_user_prompt(text: &str) -> String {
    format!("Aşağıdaki taslak prompt'u analiz et ve geliştir: \"{}\"", text)
}

pub fn enhancement_temperature(tier: ModelTier) -> f32 {
    match tier {
        ModelTier::Flash => 0.5,
        ModelTier::Pro => 0.6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, content: &str) -> GroundingDocument {
        GroundingDocument {
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_grammar_instruction_without_extras() {
        let instruction = grammar_system_instruction(None, &[]);
        assert!(instruction.starts_with("Sen 'Yazım Doktoru'"));
        assert!(!instruction.contains("kullanıcı bağlamını"));
        assert!(!instruction.contains("Döküman"));
        assert!(instruction.ends_with("Cevabını sadece istenen JSON formatında ver."));
    }

    #[test]
    fn test_grammar_instruction_blank_context_is_ignored() {
        let instruction = grammar_system_instruction(Some("   "), &[]);
        assert!(!instruction.contains("kullanıcı bağlamını"));
    }

    #[test]
    fn test_grammar_instruction_includes_context() {
        let instruction =
            grammar_system_instruction(Some("Yazılım mühendisiyim, 'deploy' doğru kabul edilsin"), &[]);
        assert!(instruction.contains("'Yazılım mühendisiyim, 'deploy' doğru kabul edilsin'"));
        assert!(instruction.contains("hata olarak işaretleme"));
    }

    #[test]
    fn test_grammar_instruction_includes_documents_as_primary_source() {
        let docs = vec![doc("kılavuz.txt", "ki bağlacı ayrı yazılır"), doc("terimler.csv", "a;b")];
        let instruction = grammar_system_instruction(None, &docs);
        assert!(instruction.contains("BİRİNCİL ve TEK doğruluk"));
        assert!(instruction.contains(
            "--- Döküman: kılavuz.txt ---\nki bağlacı ayrı yazılır\n\n--- Döküman: terimler.csv ---\na;b"
        ));
        assert!(instruction.ends_with("JSON formatında ver."));
    }

    #[test]
    fn test_user_prompts_quote_text() {
        assert!(grammar_user_prompt("merhaba").ends_with("Metin: \"merhaba\""));
        assert!(language_detection_prompt("hello").ends_with("Metin: \"hello\""));
        assert!(enhancement_user_prompt("yaz").ends_with("\"yaz\""));
    }

    #[test]
    fn test_translation_prompts_follow_direction() {
        let to_en = translation_user_prompt("kedi", TranslationDirection::TurkishToEnglish);
        assert!(to_en.contains("Türkçe metni İngilizce'ye"));
        let to_tr = translation_user_prompt("cat", TranslationDirection::EnglishToTurkish);
        assert!(to_tr.contains("İngilizce metni Türkçe'ye"));
        assert!(translation_system_instruction(TranslationDirection::EnglishToTurkish)
            .contains("translated Turkish text"));
    }

    #[test]
    fn test_enhancement_auto_level() {
        let auto = enhancement_system_instruction(EnhancementLevel::new(0), false);
        assert!(auto.contains("karmaşıklığını analiz et"));
        assert!(!auto.contains("MUTLAKA"));

        let forced = enhancement_system_instruction(EnhancementLevel::new(0), true);
        assert!(forced.contains("MUTLAKA"));
        assert!(!forced.contains("karmaşıklığını analiz et"));
    }

    #[test]
    fn test_enhancement_positive_level() {
        let instruction = enhancement_system_instruction(EnhancementLevel::new(12), false);
        assert!(instruction.contains("yaklaşık olarak +12 seviyesinde"));
        assert!(instruction.contains("sadece gerçekten gerekli olduğunda"));

        let forced = enhancement_system_instruction(EnhancementLevel::new(12), true);
        assert!(!forced.contains("sadece gerçekten gerekli olduğunda"));
    }

    #[test]
    fn test_enhancement_negative_level() {
        let instruction = enhancement_system_instruction(EnhancementLevel::new(-7), false);
        assert!(instruction.contains("yaklaşık olarak -7 seviyesinde"));
        assert!(!instruction.contains("ROL ve BAĞLAM yapısını koru"));

        let forced = enhancement_system_instruction(EnhancementLevel::new(-7), true);
        assert!(forced.contains("ROL ve BAĞLAM yapısını koru"));
    }

    #[test]
    fn test_enhancement_level_is_clamped_before_rendering() {
        let instruction = enhancement_system_instruction(EnhancementLevel::new(99), false);
        assert!(instruction.contains("+30 seviyesinde"));
    }

    #[test]
    fn test_enhancement_temperature_per_tier() {
        assert_eq!(enhancement_temperature(ModelTier::Flash), 0.5);
        assert_eq!(enhancement_temperature(ModelTier::Pro), 0.6);
    }
}
