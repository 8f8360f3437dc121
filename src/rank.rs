use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use crate::catalog::Entry;
use crate::distance::{Direction, Metric};
use crate::error::Result;

/// 一条检索结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub score: f32,
    pub id: String,
}

/// 在图库中查找与目标最相似的 n 张图片
///
/// 参数：
/// - target: 目标图片的描述符
/// - target_id: 目标图片的标识符，图库中同名的条目会被排除
/// - entries: 图库条目
/// - metric: 比较方式
/// - n: 返回的结果数量，超过可用条目数时返回全部
///
/// 分数相同时按标识符升序排列
pub fn rank<D, M>(
    target: &D,
    target_id: &str,
    entries: &[Entry<D>],
    metric: &M,
    n: usize,
) -> Result<Vec<RankedMatch>>
where
    M: Metric<D>,
{
    let mut matches = entries
        .iter()
        .filter(|entry| entry.id != target_id)
        .map(|entry| {
            let score = metric.score(target, &entry.descriptor)?;
            Ok(RankedMatch { score, id: entry.id.clone() })
        })
        .collect::<Result<Vec<_>>>()?;

    let direction = metric.direction();
    matches.sort_by(|a, b| compare(a, b, direction));
    debug!("ranked {} candidates, keeping {}", matches.len(), n.min(matches.len()));
    matches.truncate(n);

    Ok(matches)
}

fn compare(a: &RankedMatch, b: &RankedMatch, direction: Direction) -> Ordering {
    let by_score = match direction {
        Direction::Ascending => a.score.total_cmp(&b.score),
        Direction::Descending => b.score.total_cmp(&a.score),
    };
    by_score.then_with(|| a.id.cmp(&b.id))
}
