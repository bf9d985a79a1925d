pub mod notice_host;
pub mod page_header;

pub use notice_host::NoticeHost;
pub use page_header::PageHeader;
