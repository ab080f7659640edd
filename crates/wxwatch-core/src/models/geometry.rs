//! 화면 좌표계 모델.
//!
//! 모든 좌표는 화면 절대 좌표(픽셀)이다.

use serde::{Deserialize, Serialize};

/// 화면 좌표
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 오프셋만큼 이동한 좌표
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// 텍스트 영역 사각형 (OCR 결과의 4개 꼭짓점)
///
/// 꼭짓점 순서는 OCR 제공자가 준 그대로 유지한다. 보통 좌상단부터 시계방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// 축 정렬 박스로부터 사각형 생성 (좌상단, 우상단, 우하단, 좌하단)
    pub fn from_rect(x: i32, y: i32, width: u32, height: u32) -> Self {
        let right = x.saturating_add_unsigned(width);
        let bottom = y.saturating_add_unsigned(height);
        Self([
            Point::new(x, y),
            Point::new(right, y),
            Point::new(right, bottom),
            Point::new(x, bottom),
        ])
    }

    /// 색상 프로브 기준점: 첫 번째 꼭짓점 (중심점이 아님)
    pub fn anchor(&self) -> Point {
        self.0[0]
    }

    /// 네 꼭짓점의 정수 평균 (0 방향 절삭)
    pub fn center(&self) -> Point {
        let sum_x: i64 = self.0.iter().map(|p| p.x as i64).sum();
        let sum_y: i64 = self.0.iter().map(|p| p.y as i64).sum();
        Point::new((sum_x / 4) as i32, (sum_y / 4) as i32)
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

/// OCR 대상 영역 크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionVariant {
    /// 창 좌상단 일부 (대화 목록 제목 영역)
    Narrow,
    /// 창 전체
    Full,
}

/// 창 위치 및 크기
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowBounds {
    /// 좌상단 좌표
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// 최소 크기 이상인지 (작은 로그인/QR 창은 "창 없음"으로 취급)
    pub fn meets_minimum(&self, min_width: u32, min_height: u32) -> bool {
        self.width >= min_width && self.height >= min_height
    }

    /// OCR 캡처 영역 계산
    ///
    /// `Narrow`는 좌상단 기준 `min(limit_w, width) × min(limit_h, height)`.
    pub fn region(&self, variant: RegionVariant, narrow_limit: (u32, u32)) -> WindowBounds {
        match variant {
            RegionVariant::Full => *self,
            RegionVariant::Narrow => WindowBounds {
                x: self.x,
                y: self.y,
                width: self.width.min(narrow_limit.0),
                height: self.height.min(narrow_limit.1),
            },
        }
    }
}

/// RGB 색상
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 채널별 차이 중 최댓값
    pub fn max_channel_diff(&self, other: &Rgb) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
