// ==========================================
// 订单报表核心 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / XML (.xml)
// 输出: 规范字段顺序的原始字段元组，交给订单模型校验
// ==========================================

use crate::domain::{OrderField, SourceFormat};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::order_importer_trait::{RawRecord, RawRecordIter, RecordParser};
use csv::ReaderBuilder;
use quick_xml::events::Event;
use quick_xml::Reader;

/// XML 中每条订单的重复元素名
pub const RECORD_TAG: &[u8] = b"request";

/// CSV 固定分隔符
pub const CSV_DELIMITER: u8 = b',';

/// 按格式选择解析器
pub fn parser_for(format: SourceFormat) -> Box<dyn RecordParser> {
    match format {
        SourceFormat::Csv => Box::new(CsvParser),
        SourceFormat::Xml => Box::new(XmlParser),
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 规则:
// - 第一条非空记录一律视为表头丢弃
// - 空行跳过，不产生提示
// - 不处理引号，按逗号直接切分；字段数不一致原样交给订单模型
pub struct CsvParser;

impl RecordParser for CsvParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::Csv
    }

    fn parse<'a>(&self, source: &'a [u8]) -> ImportResult<RawRecordIter<'a>> {
        let reader = ReaderBuilder::new()
            .delimiter(CSV_DELIMITER)
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .quoting(false)
            .from_reader(source);

        // 按字节读取，非法 UTF-8 只影响所在行（替换字符使该行校验失败）
        let records = reader.into_byte_records().map(|result| {
            let record = result?;
            let position = record.position().map_or(0, |p| p.line() as usize);
            let fields: Vec<String> = record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect();
            let descriptor = fields.join(",");
            Ok(RawRecord {
                position,
                fields,
                descriptor,
            })
        });

        Ok(Box::new(records))
    }
}

// ==========================================
// XML Parser 实现
// ==========================================
// 规则:
// - 找出所有 <request> 元素，按字段名读取五个子元素（与子元素顺序无关）
// - 子元素缺失 → 空字符串（由订单模型判定失败）
// - 文档格式错误 → 整个文件失败，只报告一次
pub struct XmlParser;

impl RecordParser for XmlParser {
    fn format(&self) -> SourceFormat {
        SourceFormat::Xml
    }

    fn parse<'a>(&self, source: &'a [u8]) -> ImportResult<RawRecordIter<'a>> {
        // 先完整读取文档，保证结构错误在产出任何记录之前暴露
        let records = read_record_elements(source)?;
        Ok(Box::new(records.into_iter().map(Ok)))
    }
}

/// 正在读取的 <request> 元素
struct PendingElement {
    depth: usize,
    values: [Option<String>; OrderField::COUNT],
    capturing: Option<(OrderField, usize)>, // (字段, 字段元素深度)
}

impl PendingElement {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            values: Default::default(),
            capturing: None,
        }
    }

    /// 只取每个字段第一次出现的子元素
    fn open(&mut self, name: &[u8], depth: usize) {
        if self.capturing.is_some() {
            return;
        }
        if let Some(field) = OrderField::from_tag_name(name) {
            let slot = &mut self.values[field.index()];
            if slot.is_none() {
                *slot = Some(String::new());
                self.capturing = Some((field, depth));
            }
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.capturing.is_some() {
            return;
        }
        if let Some(field) = OrderField::from_tag_name(name) {
            self.values[field.index()].get_or_insert_with(String::new);
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((field, _)) = self.capturing {
            if let Some(value) = self.values[field.index()].as_mut() {
                value.push_str(text);
            }
        }
    }

    fn close(&mut self, depth: usize) {
        if matches!(self.capturing, Some((_, d)) if d == depth) {
            self.capturing = None;
        }
    }

    fn finish(self, position: usize) -> RawRecord {
        let fields: Vec<String> = self
            .values
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let descriptor = fields.join(",");
        RawRecord {
            position,
            fields,
            descriptor,
        }
    }
}

fn content_after_root() -> ImportError {
    ImportError::MalformedSource("根元素闭合后仍有元素".to_string())
}

fn read_record_elements(source: &[u8]) -> ImportResult<Vec<RawRecord>> {
    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::new();
    let mut records = Vec::new();
    let mut current: Option<PendingElement> = None;
    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut root_closed = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if root_closed {
                    return Err(content_after_root());
                }
                depth += 1;
                seen_root = true;
                match current.as_mut() {
                    Some(pending) => pending.open(e.name().as_ref(), depth),
                    None if e.name().as_ref() == RECORD_TAG => {
                        current = Some(PendingElement::new(depth));
                    }
                    None => {}
                }
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(content_after_root());
                }
                seen_root = true;
                // 自闭合的根元素
                root_closed = depth == 0;
                match current.as_mut() {
                    Some(pending) => pending.empty(e.name().as_ref()),
                    None if e.name().as_ref() == RECORD_TAG => {
                        let position = records.len() + 1;
                        records.push(PendingElement::new(depth + 1).finish(position));
                    }
                    None => {}
                }
            }
            Event::Text(t) => {
                // 根元素之外只允许空白
                if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) {
                    return Err(ImportError::MalformedSource(
                        "根元素之外存在文本内容".to_string(),
                    ));
                }
                if let Some(pending) = current.as_mut() {
                    pending.text(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if depth == 0 {
                    return Err(ImportError::MalformedSource(
                        "根元素之外存在 CDATA 段".to_string(),
                    ));
                }
                if let Some(pending) = current.as_mut() {
                    let text = std::str::from_utf8(&c)
                        .map_err(|e| ImportError::XmlParseError(e.to_string()))?;
                    pending.text(text);
                }
            }
            Event::End(_) => {
                let finished = matches!(current.as_ref(), Some(pending) if pending.depth == depth);
                if finished {
                    if let Some(pending) = current.take() {
                        let position = records.len() + 1;
                        records.push(pending.finish(position));
                    }
                } else if let Some(pending) = current.as_mut() {
                    pending.close(depth);
                }
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    root_closed = true;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !seen_root {
        return Err(ImportError::MalformedSource("文档中没有根元素".to_string()));
    }
    if depth != 0 {
        return Err(ImportError::MalformedSource(format!(
            "文档在 {} 个元素闭合前结束",
            depth
        )));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(parser: &dyn RecordParser, input: &str) -> ImportResult<Vec<RawRecord>> {
        parser.parse(input.as_bytes())?.collect()
    }

    #[test]
    fn test_csv_parser_skips_header_and_blank_lines() {
        let input = "Client_Id,Request_Id,Name,Quantity,Price\n\nAB,1,Widget,2,10.00\n\nCD,2,Gadget,1,5.50\n";
        let records = collect(&CsvParser, input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["AB", "1", "Widget", "2", "10.00"]);
        assert_eq!(records[0].position, 3);
        assert_eq!(records[1].descriptor, "CD,2,Gadget,1,5.50");
    }

    #[test]
    fn test_csv_parser_header_is_first_non_empty_line() {
        let input = "\n\nAB,1,Widget,2,10.00\nCD,2,Gadget,1,5.50";
        let records = collect(&CsvParser, input).unwrap();

        // 第一条非空记录无论内容都作为表头丢弃
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields[0], "CD");
    }

    #[test]
    fn test_csv_parser_passes_field_count_through() {
        let input = "h\nAB,1,Widget\nAB,1,Widget,2,10.00,extra\n\"AB\",1,Widget,2,10.00\r\n";
        let records = collect(&CsvParser, input).unwrap();

        assert_eq!(records[0].fields.len(), 3);
        assert_eq!(records[1].fields.len(), 6);
        // 不处理引号
        assert_eq!(records[2].fields[0], "\"AB\"");
        assert_eq!(records[2].descriptor, "\"AB\",1,Widget,2,10.00");
    }

    #[test]
    fn test_csv_parser_header_only() {
        let records = collect(&CsvParser, "Client_Id,Request_Id,Name,Quantity,Price\n\n\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_csv_parser_invalid_utf8_stays_on_its_line() {
        let mut input = b"header\nAB,1,Widget,2,10.00\nCD,2,G".to_vec();
        input.push(0xff);
        input.extend_from_slice(b"x,1,5.50\nEF,3,Bolt,1,1.00\n");

        let records: Vec<RawRecord> = CsvParser
            .parse(&input)
            .unwrap()
            .collect::<ImportResult<_>>()
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].fields[2], "G\u{FFFD}x");
        assert_eq!(records[1].position, 3);
        assert_eq!(records[2].descriptor, "EF,3,Bolt,1,1.00");
    }

    #[test]
    fn test_xml_parser_reads_fields_by_name() {
        let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<requests>
    <request>
        <price>10.00</price>
        <clientId>AB</clientId>
        <requestId>1</requestId>
        <name>Widget &amp; Co</name>
        <quantity>2</quantity>
    </request>
    <request>
        <clientId>CD</clientId>
        <requestId>2</requestId>
        <name><![CDATA[Gadget]]></name>
        <quantity>1</quantity>
        <price>5.50</price>
    </request>
</requests>"#;
        let records = collect(&XmlParser, input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["AB", "1", "Widget & Co", "2", "10.00"]);
        assert_eq!(records[0].position, 1);
        assert_eq!(records[1].descriptor, "CD,2,Gadget,1,5.50");
    }

    #[test]
    fn test_xml_parser_missing_child_is_empty_string() {
        let input = "<requests><request><clientId>AB</clientId><requestId>1</requestId>\
                     <name>Widget</name><price>10.00</price></request><request/></requests>";
        let records = collect(&XmlParser, input).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fields, vec!["AB", "1", "Widget", "", "10.00"]);
        assert_eq!(records[0].descriptor, "AB,1,Widget,,10.00");
        assert_eq!(records[1].fields, vec!["", "", "", "", ""]);
    }

    #[test]
    fn test_xml_parser_first_occurrence_wins() {
        let input = "<requests><request><clientId>AB</clientId><clientId>ZZ</clientId>\
                     <quantity/></request></requests>";
        let records = collect(&XmlParser, input).unwrap();

        assert_eq!(records[0].fields[OrderField::ClientId.index()], "AB");
        assert_eq!(records[0].fields[OrderField::Quantity.index()], "");
    }

    #[test]
    fn test_xml_parser_malformed_document() {
        for input in [
            "<requests><request><clientId>AB</clientId></request>",
            "<requests><request></requests>",
            "",
            "<requests><request><name>a &bogus; b</name></request></requests>",
            // 根元素之后的第二个元素
            "<requests><request/></requests><junk/>",
            "<requests><request/></requests><requests></requests>",
            // 根元素前后的非空白文本
            "garbage text<requests><request/></requests>",
            "<requests><request/></requests>trailing",
        ] {
            assert!(XmlParser.parse(input.as_bytes()).is_err(), "{:?} should fail", input);
        }
    }

    #[test]
    fn test_xml_parser_allows_whitespace_and_comments_around_root() {
        let input = "<?xml version=\"1.0\"?>\n<!-- orders -->\n\t<requests><request/></requests>\n<!-- end -->\n\n";
        let records = collect(&XmlParser, input).unwrap();
        assert_eq!(records.len(), 1);

        let records = collect(&XmlParser, "<request/>").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parser_for_format() {
        assert_eq!(parser_for(SourceFormat::Csv).format(), SourceFormat::Csv);
        assert_eq!(parser_for(SourceFormat::Xml).format(), SourceFormat::Xml);
    }
}
