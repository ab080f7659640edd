//! 상태 코드와 분류 결과 모델.
//!
//! 분류기는 사이클마다 정확히 하나의 `Classification`을 만든다.
//! 페이로드 종류는 상태 코드가 결정하며, 한 코드에 두 종류가 섞이지 않는다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

use super::geometry::Point;

/// 상태 행에서 "페이로드 없음"을 나타내는 문자열
pub const NONE_CONTENT: &str = "None";

/// 페이로드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    None,
    Coordinate,
    Text,
}

/// 분류 상태 코드 (닫힌 열거형)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// 100: 수금 도우미 대화창 선택됨
    DialogSelected,
    /// 101: 수금 도우미 대화창 미선택 (클릭 좌표 포함)
    DialogNotSelected,
    /// 102: 수금 도우미 라벨 미발견
    AssistantNotFound,
    /// 200: 계정 로그아웃됨
    AccountLoggedOut,
    /// 201: 계정 전환 화면 (클릭 좌표 포함)
    SwitchingAccount,
    /// 202: 진입 중
    LoggingIn,
    /// 203: 휴대폰에서 로그인 확인 필요
    MobileLoginRequired,
    /// 300: 로그인 QR 코드 감지 (디코딩 문자열 포함)
    LoginQrDetected,
    /// 900: 알 수 없는 화면 / 창·QR 없음
    UnknownScreen,
}

impl StatusCode {
    /// 전체 코드 목록 (코드 번호 순)
    pub const ALL: [StatusCode; 9] = [
        StatusCode::DialogSelected,
        StatusCode::DialogNotSelected,
        StatusCode::AssistantNotFound,
        StatusCode::AccountLoggedOut,
        StatusCode::SwitchingAccount,
        StatusCode::LoggingIn,
        StatusCode::MobileLoginRequired,
        StatusCode::LoginQrDetected,
        StatusCode::UnknownScreen,
    ];

    /// 숫자 코드
    pub fn code(self) -> u16 {
        match self {
            Self::DialogSelected => 100,
            Self::DialogNotSelected => 101,
            Self::AssistantNotFound => 102,
            Self::AccountLoggedOut => 200,
            Self::SwitchingAccount => 201,
            Self::LoggingIn => 202,
            Self::MobileLoginRequired => 203,
            Self::LoginQrDetected => 300,
            Self::UnknownScreen => 900,
        }
    }

    /// 숫자 코드 → 상태 (정의되지 않은 코드는 None)
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// 코드가 요구하는 페이로드 종류
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            Self::DialogNotSelected | Self::SwitchingAccount => PayloadKind::Coordinate,
            Self::LoginQrDetected => PayloadKind::Text,
            _ => PayloadKind::None,
        }
    }

    /// 안정적인 식별 키 (대시보드 연동용)
    pub fn key(self) -> &'static str {
        match self {
            Self::DialogSelected => "dialog_selected",
            Self::DialogNotSelected => "dialog_not_selected",
            Self::AssistantNotFound => "no_wechat_assistant",
            Self::AccountLoggedOut => "account_logged_out",
            Self::SwitchingAccount => "switching_account",
            Self::LoggingIn => "logging_in",
            Self::MobileLoginRequired => "mobile_login_required",
            Self::LoginQrDetected => "qrcode_detected",
            Self::UnknownScreen => "no_window_or_qrcode",
        }
    }

    /// 사람이 읽는 설명
    pub fn description(self) -> &'static str {
        match self {
            Self::DialogSelected => "수금 도우미 대화창 선택됨",
            Self::DialogNotSelected => "수금 도우미 대화창 미선택",
            Self::AssistantNotFound => "수금 도우미 미발견",
            Self::AccountLoggedOut => "현재 계정 로그아웃됨",
            Self::SwitchingAccount => "계정 전환 중",
            Self::LoggingIn => "위챗 진입 중",
            Self::MobileLoginRequired => "휴대폰에서 로그인 확인 필요",
            Self::LoginQrDetected => "로그인 QR 코드 감지, 스캔 대기",
            Self::UnknownScreen => "위챗 창 또는 QR 코드 미감지",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 분류 페이로드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Payload {
    None,
    Coordinate(Point),
    Text(String),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::None => PayloadKind::None,
            Self::Coordinate(_) => PayloadKind::Coordinate,
            Self::Text(_) => PayloadKind::Text,
        }
    }

    /// 상태 행 `content` 문자열: `"None"`, `"(x, y)"`, 또는 원문
    pub fn to_content(&self) -> String {
        match self {
            Self::None => NONE_CONTENT.to_string(),
            Self::Coordinate(p) => format!("({}, {})", p.x, p.y),
            Self::Text(s) => s.clone(),
        }
    }

    /// `content` 문자열을 주어진 종류로 해석
    pub fn parse(kind: PayloadKind, content: &str) -> Result<Self, CoreError> {
        match kind {
            PayloadKind::None if content == NONE_CONTENT => Ok(Self::None),
            PayloadKind::None => Err(CoreError::validation(
                "content",
                format!("페이로드 없음이어야 함: {content:?}"),
            )),
            PayloadKind::Coordinate => parse_coordinate(content)
                .map(Self::Coordinate)
                .ok_or_else(|| {
                    CoreError::validation("content", format!("좌표 형식 아님: {content:?}"))
                }),
            PayloadKind::Text => Ok(Self::Text(content.to_string())),
        }
    }
}

/// `"(x, y)"` 형식 좌표 파싱
fn parse_coordinate(content: &str) -> Option<Point> {
    let inner = content.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// 한 사이클의 분류 결과 `(StatusCode, Payload)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    code: StatusCode,
    payload: Payload,
}

impl Classification {
    /// 코드와 페이로드 종류가 맞는지 검증 후 생성
    pub fn new(code: StatusCode, payload: Payload) -> Result<Self, CoreError> {
        if code.payload_kind() != payload.kind() {
            return Err(CoreError::validation(
                "payload",
                format!(
                    "상태 {} 는 {:?} 페이로드가 필요함 (받음: {:?})",
                    code.code(),
                    code.payload_kind(),
                    payload.kind()
                ),
            ));
        }
        Ok(Self { code, payload })
    }

    /// 페이로드 없는 상태
    pub(crate) fn bare(code: StatusCode) -> Self {
        debug_assert_eq!(code.payload_kind(), PayloadKind::None);
        Self {
            code,
            payload: Payload::None,
        }
    }

    /// 좌표 페이로드 상태
    pub(crate) fn at(code: StatusCode, point: Point) -> Self {
        debug_assert_eq!(code.payload_kind(), PayloadKind::Coordinate);
        Self {
            code,
            payload: Payload::Coordinate(point),
        }
    }

    /// 문자열 페이로드 상태
    pub(crate) fn text(code: StatusCode, text: String) -> Self {
        debug_assert_eq!(code.payload_kind(), PayloadKind::Text);
        Self {
            code,
            payload: Payload::Text(text),
        }
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// 저장소 행으로 변환
    pub fn to_record(&self, updated_at: DateTime<Utc>) -> StatusRecord {
        StatusRecord {
            code: self.code.code().to_string(),
            content: self.payload.to_content(),
            updated_at,
        }
    }

    /// 저장된 행을 다시 분류 결과로 해석 (소비자 측)
    pub fn from_record(record: &StatusRecord) -> Result<Self, CoreError> {
        let numeric: u16 = record.code.trim().parse().map_err(|_| {
            CoreError::validation("code", format!("숫자 코드 아님: {:?}", record.code))
        })?;
        let code = StatusCode::from_code(numeric).ok_or_else(|| {
            CoreError::validation("code", format!("알 수 없는 상태 코드: {numeric}"))
        })?;
        let payload = Payload::parse(code.payload_kind(), &record.content)?;
        Ok(Self { code, payload })
    }
}

/// 상태 저장소의 단일 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// 숫자 상태 코드 문자열 (예: "101")
    pub code: String,
    /// `"None"`, 디코딩 문자열, 또는 `"(x, y)"`
    pub content: String,
    /// 기록 시각
    pub updated_at: DateTime<Utc>,
}
