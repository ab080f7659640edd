//! # wxwatch-vision
//!
//! 비전 어댑터 크레이트.
//! 스크린/영역 캡처와 단일 픽셀 샘플링(xcap), 텍스트 인식(Tesseract, `ocr` feature),
//! QR 코드 디코딩(rqrr)을 담당한다.

pub mod capture;
pub mod local_ocr_provider;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod qr;
