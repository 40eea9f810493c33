pub mod track;
pub mod video_id;
