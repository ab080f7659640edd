//! 단일 픽셀 색상 프로브.
//!
//! 라벨 텍스트 좌상단 꼭짓점 바로 옆에는 대화 목록의 선택 강조 배경이 있다.
//! 그 픽셀이 기준 회색에 가까우면 "선택됨"이다.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::geometry::{Point, Rgb};
use crate::ports::vision::PixelSampler;

/// 색상 프로브 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProbe {
    /// 기준 색상 (선택 강조 배경)
    #[serde(default = "default_reference")]
    pub reference: Rgb,
    /// 채널별 허용 오차
    #[serde(default = "default_tolerance")]
    pub tolerance: u8,
    /// 기준점에서의 X 오프셋 (음수는 왼쪽)
    #[serde(default = "default_offset")]
    pub offset_x: i32,
    /// 기준점에서의 Y 오프셋 (음수는 위쪽)
    #[serde(default = "default_offset")]
    pub offset_y: i32,
}

impl Default for ColorProbe {
    fn default() -> Self {
        Self {
            reference: default_reference(),
            tolerance: default_tolerance(),
            offset_x: default_offset(),
            offset_y: default_offset(),
        }
    }
}

impl ColorProbe {
    /// 색상이 기준 색상 허용 오차 안인지
    pub fn accepts(&self, color: Rgb) -> bool {
        color.max_channel_diff(&self.reference) <= self.tolerance
    }

    /// 기준점 + 오프셋 위치의 픽셀이 기준 색상과 일치하는지
    ///
    /// 샘플링 실패/화면 밖은 불일치로 처리한다.
    pub fn matches(&self, sampler: &dyn PixelSampler, anchor: Point) -> bool {
        let point = anchor.offset(self.offset_x, self.offset_y);
        match sampler.sample(point) {
            Ok(Some(color)) => {
                let matched = self.accepts(color);
                debug!(
                    x = point.x,
                    y = point.y,
                    ?color,
                    matched,
                    "색상 프로브"
                );
                matched
            }
            Ok(None) => {
                debug!(x = point.x, y = point.y, "프로브 위치가 화면 밖");
                false
            }
            Err(e) => {
                warn!(x = point.x, y = point.y, error = %e, "픽셀 샘플링 실패");
                false
            }
        }
    }
}

fn default_reference() -> Rgb {
    Rgb::new(210, 210, 210)
}
fn default_tolerance() -> u8 {
    10
}
fn default_offset() -> i32 {
    -2
}
