use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // Practice feedback
        en.insert("hint_label".to_string(), "💡 Hint:".to_string());
        en.insert("output_label".to_string(), "Command output:".to_string());
        en.insert("flags_label".to_string(), "Flags:".to_string());
        en.insert("step_complete".to_string(), "🎉 Correct! Tutorial step complete.".to_string());
        en.insert("next_step".to_string(), "Next step: #{0} {1}  (harbor show {0})".to_string());
        en.insert("last_step".to_string(), "⚓ That was the last step in the harbor.".to_string());
        en.insert("try_expected".to_string(), "✨ Command accepted, but this step expects: {0}".to_string());
        en.insert("diff_label".to_string(), "Expected vs yours:".to_string());
        en.insert("no_expected_command".to_string(), "This step is reading only; there is no command to practise.".to_string());

        // Shell
        en.insert("shell_banner".to_string(), "Harbor practice shell. Type docker commands, 'help <verb>' for usage, 'exit' to leave.".to_string());
        en.insert("shell_tutorial".to_string(), "Practising step #{0}: {1}".to_string());
        en.insert("shell_goodbye".to_string(), "👋 Leaving the harbor.".to_string());

        // Tutorials
        en.insert("no_tutorials".to_string(), "No tutorials found".to_string());
        en.insert("section_not_found".to_string(), "No tutorials found for section: {0}".to_string());
        en.insert("available_sections".to_string(), "Available sections: {0}".to_string());
        en.insert("sample_output".to_string(), "Sample output:".to_string());
        en.insert("no_matches".to_string(), "No tutorials match '{0}'".to_string());
        en.insert("col_id".to_string(), "ID".to_string());
        en.insert("col_section".to_string(), "Section".to_string());
        en.insert("col_step".to_string(), "Step".to_string());
        en.insert("col_title".to_string(), "Title".to_string());
        en.insert("col_status".to_string(), "Status".to_string());
        en.insert("status_done".to_string(), "✔ done".to_string());
        en.insert("status_attempts".to_string(), "{0} attempts".to_string());
        en.insert("label_section".to_string(), "Section {0}, step {1}".to_string());
        en.insert("label_expected".to_string(), "Practice command".to_string());
        en.insert("label_concept".to_string(), "Docker concept".to_string());
        en.insert("label_metaphor".to_string(), "Harbor metaphor".to_string());
        en.insert("label_tip".to_string(), "Tip".to_string());
        en.insert("label_reference".to_string(), "Command reference".to_string());
        en.insert("label_previous".to_string(), "Previous".to_string());
        en.insert("label_next".to_string(), "Next".to_string());
        en.insert("error_tutorial_not_found".to_string(), "Tutorial {0} not found".to_string());

        // Progress
        en.insert("progress_title".to_string(), "📊 Your Progress".to_string());
        en.insert("progress_summary".to_string(), "{0} / {1} tutorials completed ({2}%)".to_string());
        en.insert("progress_in_progress".to_string(), "In progress: {0}".to_string());
        en.insert("rank_master".to_string(), "🏆 Harbor Master!".to_string());
        en.insert("rank_senior".to_string(), "⭐ Senior Captain!".to_string());
        en.insert("rank_captain".to_string(), "🌟 Captain!".to_string());
        en.insert("rank_mate".to_string(), "⚓ First Mate!".to_string());
        en.insert("rank_sailor".to_string(), "🚢 Sailor!".to_string());

        // Lifecycle
        en.insert("lifecycle_title".to_string(), "🚢 Container Lifecycle (Harbor Metaphor)".to_string());
        en.insert("lifecycle_transitions".to_string(), "🎯 Docker Commands & State Transitions".to_string());

        // Containers
        en.insert("containers_empty".to_string(), "The harbor is empty".to_string());
        en.insert("containers_summary".to_string(), "{0} containers: {1} running, {2} stopped".to_string());
        en.insert("container_created".to_string(), "Container '{0}' created from {1}".to_string());
        en.insert("container_exists".to_string(), "Container '{0}' already exists".to_string());
        en.insert("container_updated".to_string(), "Container '{0}' is now {1} (was {2})".to_string());
        en.insert("container_missing".to_string(), "No container named '{0}'".to_string());
        en.insert("container_removed".to_string(), "Container '{0}' removed".to_string());

        // Store maintenance
        en.insert("db_initialized".to_string(), "Store ready at {0}".to_string());
        en.insert("db_reset".to_string(), "All tables dropped and recreated".to_string());
        en.insert("confirm_reset".to_string(), "This deletes all tutorials, progress and containers. Type 'yes' to continue: ".to_string());
        en.insert("reset_cancelled".to_string(), "Reset cancelled".to_string());
        en.insert("seed_report".to_string(), "Seeded {0} tutorials ({1} skipped), {2} containers ({3} skipped)".to_string());
        en.insert("db_info_path".to_string(), "Location: {0}".to_string());
        en.insert("db_info_size".to_string(), "Size: {0} KB".to_string());
        en.insert("db_info_table".to_string(), "Table '{0}': {1} rows".to_string());

        // Error messages
        en.insert("error_open_store".to_string(), "Failed to open tutorial store at {0}".to_string());
        en.insert("error_seed".to_string(), "Failed to load bundled tutorials".to_string());
        en.insert("error_record_attempt".to_string(), "Failed to record attempt".to_string());
        en.insert("error_read_input".to_string(), "Failed to read input".to_string());

        // Chinese
        let mut zh = HashMap::new();
        // Practice feedback
        zh.insert("hint_label".to_string(), "💡 提示：".to_string());
        zh.insert("output_label".to_string(), "命令输出：".to_string());
        zh.insert("flags_label".to_string(), "参数：".to_string());
        zh.insert("step_complete".to_string(), "🎉 正确！本步骤已完成。".to_string());
        zh.insert("next_step".to_string(), "下一步：#{0} {1}  (harbor show {0})".to_string());
        zh.insert("last_step".to_string(), "⚓ 这是港口的最后一步。".to_string());
        zh.insert("try_expected".to_string(), "✨ 命令有效，但本步骤期望的是：{0}".to_string());
        zh.insert("diff_label".to_string(), "期望与输入对比：".to_string());
        zh.insert("no_expected_command".to_string(), "本步骤仅供阅读，没有需要练习的命令。".to_string());

        // Shell
        zh.insert("shell_banner".to_string(), "港口练习终端。输入 docker 命令，'help <动词>' 查看用法，'exit' 退出。".to_string());
        zh.insert("shell_tutorial".to_string(), "正在练习第 #{0} 步：{1}".to_string());
        zh.insert("shell_goodbye".to_string(), "👋 离开港口。".to_string());

        // Tutorials
        zh.insert("no_tutorials".to_string(), "没有找到教程".to_string());
        zh.insert("section_not_found".to_string(), "章节中没有教程：{0}".to_string());
        zh.insert("available_sections".to_string(), "可用章节：{0}".to_string());
        zh.insert("sample_output".to_string(), "示例输出：".to_string());
        zh.insert("no_matches".to_string(), "没有与 '{0}' 匹配的教程".to_string());
        zh.insert("col_id".to_string(), "编号".to_string());
        zh.insert("col_section".to_string(), "章节".to_string());
        zh.insert("col_step".to_string(), "步骤".to_string());
        zh.insert("col_title".to_string(), "标题".to_string());
        zh.insert("col_status".to_string(), "状态".to_string());
        zh.insert("status_done".to_string(), "✔ 已完成".to_string());
        zh.insert("status_attempts".to_string(), "尝试 {0} 次".to_string());
        zh.insert("label_section".to_string(), "章节 {0}，第 {1} 步".to_string());
        zh.insert("label_expected".to_string(), "练习命令".to_string());
        zh.insert("label_concept".to_string(), "Docker 概念".to_string());
        zh.insert("label_metaphor".to_string(), "港口比喻".to_string());
        zh.insert("label_tip".to_string(), "小贴士".to_string());
        zh.insert("label_reference".to_string(), "命令参考".to_string());
        zh.insert("label_previous".to_string(), "上一步".to_string());
        zh.insert("label_next".to_string(), "下一步".to_string());
        zh.insert("error_tutorial_not_found".to_string(), "找不到教程 {0}".to_string());

        // Progress
        zh.insert("progress_title".to_string(), "📊 学习进度".to_string());
        zh.insert("progress_summary".to_string(), "已完成 {0} / {1} 个教程 ({2}%)".to_string());
        zh.insert("progress_in_progress".to_string(), "进行中：{0}".to_string());
        zh.insert("rank_master".to_string(), "🏆 港务长！".to_string());
        zh.insert("rank_senior".to_string(), "⭐ 资深船长！".to_string());
        zh.insert("rank_captain".to_string(), "🌟 船长！".to_string());
        zh.insert("rank_mate".to_string(), "⚓ 大副！".to_string());
        zh.insert("rank_sailor".to_string(), "🚢 水手！".to_string());

        // Lifecycle
        zh.insert("lifecycle_title".to_string(), "🚢 容器生命周期（港口比喻）".to_string());
        zh.insert("lifecycle_transitions".to_string(), "🎯 Docker 命令与状态转换".to_string());

        // Containers
        zh.insert("containers_empty".to_string(), "港口里没有船".to_string());
        zh.insert("containers_summary".to_string(), "共 {0} 个容器：{1} 个运行中，{2} 个已停止".to_string());
        zh.insert("container_created".to_string(), "已从 {1} 创建容器 '{0}'".to_string());
        zh.insert("container_exists".to_string(), "容器 '{0}' 已存在".to_string());
        zh.insert("container_updated".to_string(), "容器 '{0}' 当前状态：{1}（之前：{2}）".to_string());
        zh.insert("container_missing".to_string(), "没有名为 '{0}' 的容器".to_string());
        zh.insert("container_removed".to_string(), "已移除容器 '{0}'".to_string());

        // Store maintenance
        zh.insert("db_initialized".to_string(), "存储已就绪：{0}".to_string());
        zh.insert("db_reset".to_string(), "所有数据表已删除并重建".to_string());
        zh.insert("confirm_reset".to_string(), "这将删除所有教程、进度和容器。输入 'yes' 继续：".to_string());
        zh.insert("reset_cancelled".to_string(), "已取消重置".to_string());
        zh.insert("seed_report".to_string(), "已导入 {0} 个教程（跳过 {1}），{2} 个容器（跳过 {3}）".to_string());
        zh.insert("db_info_path".to_string(), "位置：{0}".to_string());
        zh.insert("db_info_size".to_string(), "大小：{0} KB".to_string());
        zh.insert("db_info_table".to_string(), "数据表 '{0}'：{1} 行".to_string());

        // Error messages
        zh.insert("error_open_store".to_string(), "无法打开教程存储：{0}".to_string());
        zh.insert("error_seed".to_string(), "无法加载内置教程".to_string());
        zh.insert("error_record_attempt".to_string(), "记录尝试失败".to_string());
        zh.insert("error_read_input".to_string(), "读取输入失败".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("zh".to_string(), zh);

        // Accept several spellings of each language code
        let effective_lang = if lang.starts_with("zh") || lang == "cn" || lang == "chinese" {
            "zh"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}
