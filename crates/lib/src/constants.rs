//! # Shared Constants
//!
//! This module provides a centralized location for constants that are shared across
//! the `bystander` workspace: the deployment's emergency number, the section markers
//! of a sectioned reply, and the canned Thai messages returned when a provider fails.

/// The public emergency medical number for Thailand.
pub const EMERGENCY_NUMBER: &str = "1669";

/// The default region substituted into `[location_context]`.
pub const DEFAULT_REGION: &str = "Thailand";

/// The formatting character the providers are told never to emit.
pub const DISALLOWED_EMPHASIS: char = '*';

/// Number of characters of a provider reply echoed into the logs.
pub const LOG_PREVIEW_CHARS: usize = 200;

// --- Section markers of a sectioned reply ---

pub const ASSESSMENT_MARKER: &str = "===EMERGENCY ASSESSMENT===";
pub const GUIDANCE_MARKER: &str = "===GUIDANCE THAI===";
pub const REASONING_MARKER: &str = "===REASONING THAI===";

/// The literal a provider writes into a section it chose not to fill.
pub const NOT_APPLICABLE: &str = "N/A";

pub const ASSESSMENT_NOT_FOUND: &str = "Error: Assessment section not found.";

// --- Canned Thai messages ---

pub const UNAVAILABLE_MESSAGE: &str =
    "ขออภัย ระบบ AI หลักไม่พร้อมใช้งานในขณะนี้เนื่องจากปัญหาการตั้งค่า ";

pub const UNAVAILABLE_CONTACT_HINT: &str =
    "โปรดติดต่อ 1669 เพื่อขอความช่วยเหลือทางการแพทย์ฉุกเฉินโดยตรง";

/// Keyword that marks a choking scenario in a prompt.
pub const CHOKING_KEYWORD: &str = "อาหารติดคอ";

pub const CHOKING_FIRST_AID_HINT: &str = "คำแนะนำเบื้องต้นสำหรับอาหารติดคอ: หากผู้ป่วยไอได้ ให้กระตุ้นให้ไอต่อ หากไอไม่ได้หรือไม่มีเสียง ให้ทำการรัดกระตุกหน้าท้อง (Heimlich) และโทร 1669 ทันที";

pub const CONNECTION_MESSAGE: &str = "ขออภัย เกิดปัญหาในการเชื่อมต่อกับระบบ AI กรุณาตรวจสอบการเชื่อมต่ออินเทอร์เน็ตและลองอีกครั้ง หากเป็นเหตุฉุกเฉินโปรดโทร 1669";

pub const RATE_LIMIT_MESSAGE: &str = "ขออภัย ขณะนี้มีการใช้งานระบบ AI หนาแน่นเกินไป กรุณารอสักครู่แล้วลองอีกครั้ง หากเป็นเหตุฉุกเฉินโปรดโทร 1669";

pub const UNEXPECTED_STRUCTURE_MESSAGE: &str =
    "ขออภัย ระบบ AI ไม่สามารถสร้างคำแนะนำได้ในขณะนี้ (โครงสร้างตอบกลับไม่ถูกต้อง) หากเป็นเหตุฉุกเฉินโปรดโทร 1669";
