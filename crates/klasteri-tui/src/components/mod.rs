pub mod cluster_detail;
pub mod feed_list;
pub mod header;
pub mod help_overlay;
pub mod summary_panel;
pub mod tonight_panel;
