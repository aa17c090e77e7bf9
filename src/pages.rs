use crate::types::{ALGORITHMS, ANALYSES};

const PAGE_CSS: &str = r##"
        * { box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', 'Malgun Gothic', sans-serif;
            margin: 0;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
        }
        .container {
            max-width: 1100px;
            margin: 0 auto;
            background: white;
            border-radius: 15px;
            box-shadow: 0 20px 40px rgba(0,0,0,0.1);
            overflow: hidden;
        }
        .header {
            background: linear-gradient(135deg, #ff6b6b, #feca57);
            color: white;
            padding: 30px;
            text-align: center;
        }
        .header h1 {
            margin: 0;
            font-size: 2.2em;
            font-weight: 700;
            text-shadow: 2px 2px 4px rgba(0,0,0,0.3);
        }
        .nav {
            display: flex;
            justify-content: center;
            gap: 20px;
            background: #2d3748;
            padding: 12px;
        }
        .nav a {
            color: #e2e8f0;
            text-decoration: none;
            font-weight: 600;
        }
        .nav a:hover { color: #feca57; }
        .section {
            padding: 30px;
            border-bottom: 1px solid #e2e8f0;
        }
        .section h2 {
            margin-top: 0;
            color: #2d3748;
        }
        .ball {
            display: inline-block;
            width: 44px;
            height: 44px;
            line-height: 44px;
            border-radius: 50%;
            color: white;
            text-align: center;
            font-weight: 700;
            margin: 3px;
        }
        .b1 { background: #fbc400; }
        .b2 { background: #69c8f2; }
        .b3 { background: #ff7272; }
        .b4 { background: #aaaaaa; }
        .b5 { background: #b0d840; }
        .plus { margin: 0 8px; font-size: 1.4em; color: #718096; }
        .draw-no { font-size: 1.1em; color: #4a5568; margin-bottom: 10px; }
        .btn-row { display: flex; flex-wrap: wrap; gap: 8px; margin-bottom: 16px; }
        .btn-row button {
            border: 1px solid #cbd5e0;
            background: #f7fafc;
            border-radius: 8px;
            padding: 8px 14px;
            cursor: pointer;
            font-size: 0.95em;
        }
        .btn-row button:hover { background: #edf2f7; border-color: #4834d4; }
        .result-box {
            background: #f8f9ff;
            border-radius: 10px;
            padding: 18px;
            min-height: 40px;
            color: #2d3748;
        }
        .bar-chart {
            display: flex;
            align-items: flex-end;
            gap: 2px;
            height: 120px;
            margin-top: 14px;
        }
        .bar-chart div {
            flex: 1;
            background: #4834d4;
            border-radius: 2px 2px 0 0;
        }
        table { width: 100%; border-collapse: collapse; }
        th, td { padding: 10px; text-align: left; border-bottom: 1px solid #e2e8f0; }
        th { background: #edf2f7; color: #2d3748; }
        .chat-log {
            background: #f8f9ff;
            border-radius: 10px;
            padding: 14px;
            height: 220px;
            overflow-y: auto;
            margin-bottom: 10px;
        }
        .chat-msg { margin: 6px 0; }
        .chat-msg.user { text-align: right; color: #4834d4; }
        .chat-msg.assistant { text-align: left; color: #2d3748; }
        .chat-form { display: flex; gap: 8px; }
        .chat-form input {
            flex: 1;
            border: 1px solid #cbd5e0;
            border-radius: 8px;
            padding: 10px;
        }
        .chat-form button {
            border: none;
            background: #4834d4;
            color: white;
            border-radius: 8px;
            padding: 10px 18px;
            cursor: pointer;
        }
        .footer {
            background: #2d3748;
            color: white;
            padding: 16px;
            text-align: center;
            font-size: 0.9em;
        }
        #scroll-top {
            position: fixed;
            right: 24px;
            bottom: 24px;
            display: none;
            border: none;
            background: #4834d4;
            color: white;
            width: 44px;
            height: 44px;
            border-radius: 50%;
            cursor: pointer;
            font-size: 1.2em;
        }
"##;

const PAGE_SCRIPT: &str = r##"
(function () {
    var $ = function (sel) { return document.querySelector(sel); };

    function getJson(path) {
        return fetch(path).then(function (res) { return res.json(); });
    }

    function postJson(path, body) {
        return fetch(path, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body)
        }).then(function (res) { return res.json(); });
    }

    function ballHtml(n) {
        var cls = n <= 10 ? 'b1' : n <= 20 ? 'b2' : n <= 30 ? 'b3' : n <= 40 ? 'b4' : 'b5';
        return '<span class="ball ' + cls + '">' + n + '</span>';
    }

    function loadLatest() {
        getJson('/api/draws/latest').then(function (r) {
            var box = $('#latest-draw');
            if (!r.success) { box.textContent = r.error; return; }
            var d = r.data;
            var balls = [d.number1, d.number2, d.number3, d.number4, d.number5, d.number6]
                .map(ballHtml).join('');
            box.innerHTML = '<div class="draw-no">제' + d.draw_number + '회 (' + d.draw_date + ')</div>'
                + balls + '<span class="plus">+</span>' + ballHtml(d.bonus_number);
        });
    }

    function loadStores() {
        getJson('/api/stores').then(function (r) {
            var tbody = $('#store-rows');
            if (!r.success) { tbody.innerHTML = '<tr><td colspan="4">' + r.error + '</td></tr>'; return; }
            tbody.innerHTML = r.data.map(function (s, i) {
                return '<tr><td>' + (i + 1) + '</td><td>' + s.name + '</td><td>'
                    + s.address + '</td><td>' + s.first_prize_count + '회</td></tr>';
            }).join('');
        });
    }

    function renderBarChart(box, vis) {
        var max = Math.max.apply(null, vis.values.concat([1]));
        var bars = vis.values.map(function (v) {
            return '<div style="height:' + Math.round(v * 100 / max) + '%" title="' + v + '"></div>';
        }).join('');
        box.insertAdjacentHTML('beforeend', '<div class="bar-chart">' + bars + '</div>');
    }

    document.querySelectorAll('.analysis-btn').forEach(function (btn) {
        btn.addEventListener('click', function () {
            postJson('/api/analysis', { type: btn.dataset.token }).then(function (r) {
                var box = $('#analysis-result');
                if (!r.success) { box.textContent = r.error; return; }
                box.textContent = r.data.summary;
                if (r.data.visualization && r.data.visualization.chart_type === 'bar') {
                    renderBarChart(box, r.data.visualization);
                }
            });
        });
    });

    document.querySelectorAll('.algo-btn').forEach(function (btn) {
        btn.addEventListener('click', function () {
            postJson('/api/prediction', { algorithm: btn.dataset.token }).then(function (r) {
                var box = $('#prediction-result');
                if (!r.success) { box.textContent = r.error; return; }
                var p = r.data;
                box.innerHTML = p.numbers.map(ballHtml).join('')
                    + '<p>' + p.explanation + ' (신뢰도 ' + Math.round(p.confidence * 100) + '%)</p>';
            });
        });
    });

    function appendChat(role, text) {
        var log = $('#chat-log');
        var div = document.createElement('div');
        div.className = 'chat-msg ' + role;
        div.textContent = text;
        log.appendChild(div);
        log.scrollTop = log.scrollHeight;
    }

    $('#chat-form').addEventListener('submit', function (e) {
        e.preventDefault();
        var input = $('#chat-input');
        var message = input.value.trim();
        if (!message) { return; }
        appendChat('user', message);
        input.value = '';
        postJson('/api/chatbot', { message: message }).then(function (r) {
            appendChat('assistant', r.success ? r.data.content : r.error);
        });
    });

    var scrollTop = $('#scroll-top');
    window.addEventListener('scroll', function () {
        scrollTop.style.display = window.scrollY > 300 ? 'block' : 'none';
    });
    scrollTop.addEventListener('click', function () {
        window.scrollTo({ top: 0, behavior: 'smooth' });
    });

    loadLatest();
    loadStores();
})();
"##;

/// The whole front end is this one document; the button lists come from
/// the shared catalog so the page and the API can never disagree on
/// tokens or labels.
pub fn index_page() -> String {
    let analysis_buttons: String = ANALYSES
        .iter()
        .map(|a| {
            format!(
                r#"<button class="analysis-btn" data-token="{}">{}</button>"#,
                a.token, a.label
            )
        })
        .collect();

    let algorithm_buttons: String = ALGORITHMS
        .iter()
        .map(|a| {
            format!(
                r#"<button class="algo-btn" data-token="{}">{}</button>"#,
                a.token, a.label
            )
        })
        .collect();

    let mut html = String::new();

    html.push_str(
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>로또 6/45 정보센터</title>
    <style>"#,
    );
    html.push_str(PAGE_CSS);
    html.push_str(
        r##"</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>🎱 로또 6/45 정보센터</h1>
        </div>
        <nav class="nav">
            <a href="#latest">최신 당첨번호</a>
            <a href="#analysis">통계 분석</a>
            <a href="#prediction">AI 예측</a>
            <a href="#stores">명당 판매점</a>
            <a href="#chat">로또 챗봇</a>
        </nav>
        <section class="section" id="latest">
            <h2>최신 당첨번호</h2>
            <div class="result-box" id="latest-draw">불러오는 중...</div>
        </section>
"##,
    );

    html.push_str(&format!(
        r#"        <section class="section" id="analysis">
            <h2>통계 분석</h2>
            <div class="btn-row">{analysis_buttons}</div>
            <div class="result-box" id="analysis-result">분석 유형을 선택하세요.</div>
        </section>
        <section class="section" id="prediction">
            <h2>AI 번호 예측</h2>
            <div class="btn-row">{algorithm_buttons}</div>
            <div class="result-box" id="prediction-result">알고리즘을 선택하세요.</div>
        </section>
"#
    ));

    html.push_str(
        r#"        <section class="section" id="stores">
            <h2>1등 배출 명당</h2>
            <table>
                <thead>
                    <tr><th>순위</th><th>판매점</th><th>주소</th><th>1등 배출</th></tr>
                </thead>
                <tbody id="store-rows"></tbody>
            </table>
        </section>
        <section class="section" id="chat">
            <h2>로또 챗봇</h2>
            <div class="chat-log" id="chat-log"></div>
            <form class="chat-form" id="chat-form">
                <input id="chat-input" type="text" placeholder="예: 이번주 당첨번호 알려줘" autocomplete="off">
                <button type="submit">전송</button>
            </form>
        </section>
        <div class="footer">본 서비스의 예측 번호는 재미를 위한 참고용입니다.</div>
    </div>
    <button id="scroll-top" title="맨 위로">↑</button>
    <script>"#,
    );
    html.push_str(PAGE_SCRIPT);
    html.push_str(
        r#"</script>
</body>
</html>
"#,
    );

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_contains_every_catalog_entry() {
        let page = index_page();
        for a in &ALGORITHMS {
            assert!(page.contains(a.token));
            assert!(page.contains(a.label));
        }
        for a in &ANALYSES {
            assert!(page.contains(a.token));
        }
    }

    #[test]
    fn test_page_wires_all_endpoints() {
        let page = index_page();
        for endpoint in [
            "/api/draws/latest",
            "/api/stores",
            "/api/chatbot",
            "/api/analysis",
            "/api/prediction",
        ] {
            assert!(page.contains(endpoint), "missing {}", endpoint);
        }
    }
}
