//! 퍼지 라벨 매칭.
//!
//! OCR 결과는 손실이 있어서(오인식, 잘린 글자) 정확 일치만으로는 자주 실패하고,
//! 부분 문자열 매칭만 쓰면 짧은 라벨에서 오탐이 생긴다.
//! 우선순위: 정확 일치 > 유사도 최고점 > (유사도가 임계값 미만일 때만) 부분 문자열.

use std::collections::HashMap;

use tracing::trace;

use crate::models::text::TextCandidate;

/// 유사도 결과를 믿지 않고 부분 문자열 매칭으로 넘어가는 기준
pub const DEFAULT_FALLBACK_THRESHOLD: f64 = 0.4;

/// Ratcliff/Obershelp 유사도 (0.0 ~ 1.0)
///
/// `2·M / (|a| + |b|)`, M은 재귀적으로 찾은 최장 공통 블록 길이의 합.
/// 둘 다 빈 문자열이면 1.0. 문자 단위(유니코드 스칼라)로 비교한다.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// 공통 블록 길이 합계
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut total = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// `a[alo..ahi]`와 `b[blo..bhi]`의 최장 공통 블록 `(i, j, len)`
///
/// 같은 길이면 `a`에서 먼저, 그다음 `b`에서 먼저 시작하는 블록.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
    // j2len[j] = a[..i]와 b[..=j]로 끝나는 공통 블록 길이
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best_len {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_len = k;
                }
            }
        }
        j2len = next;
    }

    (best_i, best_j, best_len)
}

/// 후보 중 `target`에 가장 잘 맞는 하나 (기본 임계값 0.4)
pub fn find_best_match<'a>(
    candidates: &'a [TextCandidate],
    target: &str,
) -> Option<&'a TextCandidate> {
    find_best_match_with(candidates, target, DEFAULT_FALLBACK_THRESHOLD)
}

/// 임계값을 지정한 최적 후보 탐색
///
/// 1. 정확 일치 후보가 나오면 즉시 반환 (먼저 나온 것)
/// 2. 아니면 유사도 최고점 후보 추적 (동점이면 먼저 나온 것)
/// 3. 최고점이 `threshold` 미만이면 `target`을 부분 문자열로 포함하는 첫 후보, 없으면 None
/// 4. 그 외에는 최고점 후보
pub fn find_best_match_with<'a>(
    candidates: &'a [TextCandidate],
    target: &str,
    threshold: f64,
) -> Option<&'a TextCandidate> {
    let mut best: Option<&TextCandidate> = None;
    let mut best_score = 0.0;

    for candidate in candidates {
        if candidate.text == target {
            trace!(target, "정확 일치");
            return Some(candidate);
        }
        let score = similarity_ratio(&candidate.text, target);
        if score > best_score {
            best = Some(candidate);
            best_score = score;
        }
    }

    if best_score < threshold {
        let fallback = candidates.iter().find(|c| c.text.contains(target));
        trace!(
            target,
            best_score,
            found = fallback.is_some(),
            "유사도 미달, 부분 문자열 탐색"
        );
        return fallback;
    }

    trace!(target, best_score, "유사도 매칭");
    best
}
