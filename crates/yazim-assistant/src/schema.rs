//! Response schema constraining the grammar check answer.

use serde_json::{json, Value};

/// JSON schema (Gemini OpenAPI subset) for `GrammarFeedback`.
///
/// Error types are requested with their Turkish tags; `ErrorType`
/// deserialises both these and the English names.
pub fn grammar_feedback_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": {
                "type": "INTEGER",
                "description": "Yazının dil bilgisi, imla ve noktalama kurallarına uygunluğuna göre 0 ile 100 arasında bir puan. 100 mükemmel demektir."
            },
            "errors": {
                "type": "ARRAY",
                "description": "Metinde bulunan yazım ve noktalama hatalarının bir listesi.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "errorType": {
                            "type": "STRING",
                            "description": "Hatanın türü: 'yazım' (spelling) veya 'noktalama' (punctuation).",
                            "enum": ["yazım", "noktalama"]
                        },
                        "text": {
                            "type": "STRING",
                            "description": "Hatalı olan kelime veya ifade."
                        },
                        "startIndex": {
                            "type": "INTEGER",
                            "description": "Hatalı ifadenin orijinal metindeki 0-tabanlı başlangıç karakter indeksi."
                        },
                        "endIndex": {
                            "type": "INTEGER",
                            "description": "Hatalı ifadenin orijinal metindeki 0-tabanlı bitiş karakter indeksi (bu indeks dahil DEĞİL)."
                        },
                        "correction": {
                            "type": "STRING",
                            "description": "Önerilen doğru yazım veya noktalama."
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Türkçe dil bilgisi kurallarına göre hatanın kısa bir açıklaması."
                        }
                    },
                    "required": ["errorType", "text", "startIndex", "endIndex", "correction", "explanation"]
                }
            },
            "summary": {
                "type": "STRING",
                "description": "Kullanıcının performansı hakkında kısa, teşvik edici ve doktor tavsiyesi gibi bir özet."
            },
            "correctedText": {
                "type": "STRING",
                "description": "Kullanıcının metninin tüm hataları düzeltilmiş tam hali."
            }
        },
        "required": ["score", "errors", "summary", "correctedText"]
    })
}
