//! レビュー画面の選択位置
//!
//! スライダー（1ページ＝画面幅）とサムネイル列で共有する。

/// 現在表示中の画像の位置
///
/// 空でないコレクションに対しては常に `0 <= index < len`。空なら0。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    index: usize,
}

impl ActiveSelection {
    pub fn index(&self) -> usize {
        self.index
    }

    /// 範囲外の要求は最後の有効位置に丸める
    pub fn select(&mut self, requested: usize, len: usize) {
        self.index = if len == 0 { 0 } else { requested.min(len - 1) };
    }

    /// `removed` 番目が削除され、残りが `len_after` 件になった
    pub fn after_removal(&mut self, removed: usize, len_after: usize) {
        if len_after == 0 {
            self.index = 0;
        } else if removed <= self.index {
            self.index = self.index.min(len_after - 1);
        }
    }

    /// スライダーのスクロール位置
    pub fn offset(&self, page_width: f64) -> f64 {
        self.index as f64 * page_width
    }

    /// スクロール停止位置から最も近いページ
    pub fn index_for_offset(offset: f64, page_width: f64) -> usize {
        if page_width <= 0.0 || !offset.is_finite() || offset <= 0.0 {
            return 0;
        }
        (offset / page_width).round() as usize
    }
}
