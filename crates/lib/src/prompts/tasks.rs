//! # Default Task Prompts
//!
//! The hardcoded system instructions and user prompt templates for the guidance
//! operations and the experiment versions. Templates use bracketed placeholders
//! that `prompts::core::assemble` fills in.

// --- System instructions ---

/// Persona for the Claude backend. Thai only, step by step, safety first.
pub const CLAUDE_SYSTEM_PROMPT: &str = "คุณเป็นผู้ช่วย AI ที่เชี่ยวชาญการให้คำแนะนำการปฐมพยาบาลเบื้องต้นเป็นภาษาไทย กรุณาตอบเป็นภาษาไทยเท่านั้น ให้ข้อมูลที่ชัดเจน เป็นขั้นตอน และเน้นความปลอดภัย";

/// Persona for the DeepSeek backend. Same as Claude's, plus a ban on emphasis markers.
pub const DEEPSEEK_SYSTEM_PROMPT: &str = "คุณเป็นผู้ช่วย AI ที่เชี่ยวชาญการให้คำแนะนำการปฐมพยาบาลเบื้องต้นเป็นภาษาไทย กรุณาตอบเป็นภาษาไทยเท่านั้น ให้ข้อมูลที่ชัดเจน เป็นขั้นตอน และเน้นความปลอดภัย ห้ามใช้เครื่องหมาย * หรือการจัดรูปแบบ markdown ใดๆ ในคำตอบ";

// --- Live request templates ---

/// Sentence-only guidance: the caller's sentence is embedded verbatim.
pub const SENTENCE_ONLY_USER_PROMPT: &str = r#"โปรดให้คำแนะนำการปฐมพยาบาลเบื้องต้นเป็นภาษาไทยอย่างละเอียดและเป็นขั้นตอน สำหรับสถานการณ์ฉุกเฉินที่อธิบายด้วยประโยคนี้: "[user_query]". เน้นความปลอดภัยของผู้ช่วยเหลือและผู้ป่วย และแนะนำให้ติดต่อหน่วยแพทย์ฉุกเฉิน (1669) เมื่อจำเป็นอย่างยิ่ง"#;

/// Sectioned guidance: the reply must use the three section markers.
pub const SECTIONED_USER_PROMPT: &str = r#"You are the triage component of the ByStander first-aid app in [location_context].
A bystander reported the following situation: "[user_query]"
Detected emergency type: [emergency_type]
Mentioned locations: [extracted_entities]

Reply using exactly these three sections and nothing else:
===EMERGENCY ASSESSMENT===
Start with YES or NO (is this a medical emergency?), then one short sentence in English explaining why.
===GUIDANCE THAI===
If YES: numbered first-aid steps in [language], one step per line. Always include calling 1669. If NO: write N/A.
===REASONING THAI===
If YES: a short explanation in [language] of why these steps matter. If NO: write N/A.

Do not use markdown emphasis."#;

// --- Experiment version templates ---

/// V1: the query is forwarded with a minimal instruction.
pub const GENERIC_PROMPT_V1: &str = r#"Provide first-aid guidance for the following situation:
[user_query]"#;

/// V2: role and locale context, plus the intent detected by the preprocessor.
pub const GUIDANCE_PROMPT_V2: &str = r#"You are an experienced emergency medical dispatcher in [location_context] helping an untrained bystander.
Request intent: [detected_intent]

Situation described by the bystander:
"[user_query]"

Respond in [language] with:
1. The single most important immediate action.
2. Numbered first-aid steps, short and concrete.
3. When and how to call emergency services (1669 for medical, 191 for police, 199 for fire).
Keep the bystander's own safety first."#;

/// V3: entity-aware prompt that asks for "Step N:" lines the steps postprocessor can split.
pub const DYNAMIC_PROMPT_V3: &str = r#"Context: ByStander app, [location_context].
Emergency type: [emergency_type]
Locations mentioned: [extracted_entities]
User report: "[user_query]"

Write first-aid instructions in [language] as lines of the form "Step 1: ...", "Step 2: ...".
Begin with a one-sentence summary ending with a period.
If an ambulance is needed write "call 1669"; if police are needed write "call 191"."#;
