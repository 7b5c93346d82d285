//! Built-in demo bank offered on first launch.

use quiz_core::parser;

pub const SAMPLE_BANK_NAME: &str = "示例题库.txt";

pub const SAMPLE_BANK_TEXT: &str = "\
1.涉密办公自动化设备可以接入（ ）。
A.涉密计算机及其信息系统
B.单位内部非涉密计算机及其信息系统
C.国际互联网
D.公共信息网络
答案：A

2.下面符合保密工作规定的是（ ）。
A.将涉密文件扫描后做文件压缩处理发电子邮件，待对方接收之后立即删除。
B.通过微信传输带有领导批示的非涉密工作文件。
C.将工作文件草稿（密级待定）发微信群征求意见。
D.在公开讲话材料中避免引用涉密文件中的重要数据。
答案：A,D
";

#[must_use]
pub fn sample_questions() -> Vec<quiz_core::model::Question> {
    parser::parse(SAMPLE_BANK_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_bank_parses_fully() {
        let report = parser::parse_report(SAMPLE_BANK_TEXT);
        assert_eq!(report.dropped, 0);
        assert_eq!(report.questions.len(), 2);
        assert_eq!(report.questions[1].answer().as_letters(), "AD");
        assert_eq!(sample_questions(), report.questions);
    }
}
